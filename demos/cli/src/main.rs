use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use chronicle_core::{items_from_json, sort_chronologically, TimelineConfig};
use chronicle_engine::{SlideshowState, TimelineOrchestrator};
use clap::Parser;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(
    name = "chronicle-cli",
    about = "Chạy thử engine timeline từ file JSON chứa danh sách mục."
)]
struct Args {
    /// Đường dẫn tới file JSON chứa danh sách mục.
    #[arg(short, long)]
    input: PathBuf,

    /// Bật chế độ slideshow.
    #[arg(long)]
    slideshow: bool,

    /// Chu kỳ lật thẻ (mili giây).
    #[arg(long, default_value_t = 2000)]
    duration: u64,

    /// In log chi tiết của engine.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        Level::TRACE
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    let data = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Không đọc được file {:?}", args.input))?;
    let mut items = items_from_json(&data)?;
    sort_chronologically(&mut items);

    let config = TimelineConfig {
        slide_show: args.slideshow,
        slide_item_duration_ms: args.duration,
        ..TimelineConfig::default()
    };
    let orchestrator = TimelineOrchestrator::new(items, config);

    for (index, derived) in orchestrator.items().iter().enumerate() {
        println!(
            "{index:>3} [{}] {} (visible: {}, active: {})",
            derived.position.as_str(),
            derived.item.title,
            derived.visible,
            derived.active
        );
    }

    if args.slideshow {
        let mut changes = orchestrator.subscribe();
        orchestrator.start();

        loop {
            tokio::select! {
                changed = changes.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    if let Some(index) = *changes.borrow_and_update() {
                        if let Some(active) = orchestrator.items().get(index) {
                            println!("Kích hoạt thẻ {index}: {}", active.item.title);
                        }
                    }
                }
                _ = tokio::time::sleep(Duration::from_millis(args.duration)) => {
                    if orchestrator.slideshow_state() == SlideshowState::Exhausted {
                        break;
                    }
                }
            }
        }
        println!("Slideshow kết thúc.");
    }

    Ok(())
}
