use std::path::{Component, Path};

use crate::error::{StoreError, StoreResult};

/// Resolve `name` into path segments relative to a store root.
///
/// The name is treated as anchored at the root: `..` components cannot climb
/// above it and `.` components collapse away. A name that resolves to the
/// root itself (`"."`, `"/"`, the empty string, or any equivalent) fails
/// with [`StoreError::PathSanitization`].
pub(crate) fn normalize(name: &str) -> StoreResult<Vec<String>> {
    let mut parts: Vec<String> = Vec::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(c) => parts.push(c.to_string_lossy().into_owned()),
            Component::ParentDir => {
                parts.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    if parts.is_empty() {
        return Err(StoreError::PathSanitization(name.to_owned()));
    }
    Ok(parts)
}
