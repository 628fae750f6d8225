use chrono::{Local, Utc};
use colored::Colorize;
use hsdump_engine::{ReplicaConfig, Replicator};
use hsdump_store::{FsSink, S3DomainSource};

use crate::cli::Cli;

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let source = S3DomainSource::from_env(cli.bucket.clone()).await;
    let config = ReplicaConfig {
        root: cli.root.clone(),
        cutoff: cli.before.map(|t| t.with_timezone(&Utc)),
    };
    let sink = FsSink::new(&config.root);
    let engine = Replicator::new(source, sink, config);

    if cli.list {
        for listing in engine.list(&cli.domains).await? {
            println!("{}:", listing.name.bold());
            for object in &listing.objects {
                println!("    {}", object.path);
                for version in &object.versions {
                    println!(
                        "        {}\t{} Bytes\t{}",
                        version.id,
                        version.size,
                        version.last_modified.with_timezone(&Local).to_rfc3339()
                    );
                }
            }
            println!();
        }
    } else {
        let summary = engine.replicate(&cli.domains).await?;
        println!(
            "{} Replicated {} domain(s): {} object(s), {} bytes",
            "✓".green(),
            summary.domains,
            summary.objects,
            summary.bytes
        );
    }
    Ok(())
}
