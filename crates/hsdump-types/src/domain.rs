use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::{EntityId, IdPrefix, IdSuffix};

/// Per-user permission flags within a domain ACL.
///
/// Field names match the `.domain.json` wire form exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    pub create: bool,
    pub read: bool,
    pub update: bool,
    pub delete: bool,
    #[serde(rename = "readACL")]
    pub read_acl: bool,
    #[serde(rename = "updateACL")]
    pub update_acl: bool,
}

/// Access control list: user name to permission set. A `BTreeMap` keeps the
/// serialized document deterministic.
pub type Acl = BTreeMap<String, Permissions>;

/// An HSDS domain, roughly the equivalent of one HDF5 file in the bucket.
///
/// Serializes to the `.domain.json` marker document. Directory-only domains
/// have no root group, so `root` is optional and omitted when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub acls: Acl,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<EntityId>,
    pub owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<f64>,
    #[serde(
        rename = "lastModified",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_modified: Option<f64>,
}

impl Domain {
    /// The root group's ID prefix, if the domain has a root.
    pub fn prefix(&self) -> Option<IdPrefix> {
        self.root.as_ref().map(EntityId::prefix)
    }

    /// The root group's ID suffix, if the domain has a root.
    pub fn suffix(&self) -> Option<IdSuffix> {
        self.root.as_ref().map(EntityId::suffix)
    }

    /// Path prefix under which all of the domain's database objects live:
    /// `db/<prefix-text>`. Defined only when the domain has a root.
    pub fn db_prefix(&self) -> Option<String> {
        self.prefix().map(|p| format!("db/{p}"))
    }

    /// Copy of the domain with the root cleared. Ancestor directory markers
    /// are not HDF5-rooted domains themselves.
    pub fn without_root(&self) -> Domain {
        Domain {
            root: None,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityId;

    fn sample_domain() -> Domain {
        let mut acls = Acl::new();
        acls.insert(
            "admin".into(),
            Permissions {
                create: true,
                read: true,
                update: true,
                delete: true,
                read_acl: true,
                update_acl: true,
            },
        );
        Domain {
            acls,
            root: Some(EntityId::parse("g-d12a20a5-6c27622f-59a2-a82de4-afeaa7").unwrap()),
            owner: "admin".into(),
            created: Some(1_600_000_000.0),
            last_modified: Some(1_600_000_100.5),
        }
    }

    #[test]
    fn db_prefix_uses_root_prefix_text() {
        let domain = sample_domain();
        assert_eq!(domain.db_prefix().unwrap(), "db/d12a20a5-6c27622f");
    }

    #[test]
    fn db_prefix_absent_without_root() {
        let domain = Domain::default();
        assert!(domain.db_prefix().is_none());
        assert!(domain.prefix().is_none());
        assert!(domain.suffix().is_none());
    }

    #[test]
    fn without_root_clears_only_root() {
        let domain = sample_domain();
        let marker = domain.without_root();
        assert!(marker.root.is_none());
        assert_eq!(marker.owner, domain.owner);
        assert_eq!(marker.acls, domain.acls);
        assert_eq!(marker.created, domain.created);
    }

    #[test]
    fn json_wire_form() {
        let domain = sample_domain();
        let value = serde_json::to_value(&domain).unwrap();
        assert_eq!(
            value["root"],
            serde_json::json!("g-d12a20a5-6c27622f-59a2-a82de4-afeaa7")
        );
        assert_eq!(value["owner"], serde_json::json!("admin"));
        assert_eq!(value["acls"]["admin"]["readACL"], serde_json::json!(true));
        assert_eq!(value["lastModified"], serde_json::json!(1_600_000_100.5));
    }

    #[test]
    fn json_omits_absent_optionals() {
        let domain = Domain {
            owner: "nobody".into(),
            ..Domain::default()
        };
        let value = serde_json::to_value(&domain).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("root"));
        assert!(!obj.contains_key("created"));
        assert!(!obj.contains_key("lastModified"));
    }

    #[test]
    fn json_roundtrip() {
        let domain = sample_domain();
        let json = serde_json::to_string(&domain).unwrap();
        let parsed: Domain = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, domain);
    }
}
