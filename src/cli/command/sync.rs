use anyhow::Result;
use geosync::{archive::scan_local_state, sync::sync_source, transport::connect};

use super::{display_path, load_sources, today};
use crate::cli::{create_progress_bar, Target};

/// Downloads the missing files of every selected source.
pub async fn sync(target: &Target) -> Result<String> {
    let (config, sources) = load_sources(target)?;
    let download_dir = config.download_dir()?;
    let end = target.end.unwrap_or_else(today);

    for source in &sources {
        let mut state = scan_local_state(source, &download_dir)?;
        let transport = connect(source)?;

        println!(
            "Synchronising {} from {} up to {}",
            source.name,
            transport.label(),
            end
        );

        let pb = create_progress_bar(0, format!("Downloading {}...", source.name));
        let report = sync_source(source, transport, &download_dir, end, &mut state, &pb).await?;
        pb.finish_with_message(format!("{} up to date", source.name));

        println!(
            "{}: {} downloaded, {} not yet published",
            report.source,
            report.downloaded.len(),
            report.missing.len()
        );
        for task in &report.missing {
            println!("  missing {}  {}", task.reference_date, task.remote_path);
        }
        for stream in source.streams() {
            if let Some(latest) = state.latest(&stream) {
                println!("  {} latest {}", stream, latest);
            }
        }
    }

    Ok(display_path(&download_dir))
}
