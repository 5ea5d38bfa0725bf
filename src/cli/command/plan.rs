use anyhow::Result;
use geosync::{archive::scan_local_state, sync::plan_source, transport::connect};

use super::{display_path, load_sources, today};
use crate::cli::{create_spinner, Target};

/// Prints the files every selected source is missing.
pub async fn plan(target: &Target) -> Result<usize> {
    let (config, sources) = load_sources(target)?;
    let download_dir = config.download_dir()?;
    let end = target.end.unwrap_or_else(today);
    let mut pending = 0;

    for source in &sources {
        let state = scan_local_state(source, &download_dir)?;
        let transport = connect(source)?;

        let bar = create_spinner(format!("Planning {}...", source.name));
        let plans = plan_source(source, transport.as_ref(), &download_dir, end, &state).await?;
        bar.finish_and_clear();

        for stream_plan in plans {
            println!(
                "{} {}: {} file(s) to fetch into {}",
                source.name,
                stream_plan.stream,
                stream_plan.tasks.len(),
                display_path(&source.local_dir(&download_dir))
            );
            for task in &stream_plan.tasks {
                println!("  {}  {}", task.reference_date, task.remote_path);
            }
            pending += stream_plan.tasks.len();
        }
    }

    Ok(pending)
}
