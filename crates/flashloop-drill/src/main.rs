use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use flashloop_drill::screens::queue_session;
use flashloop_drill::{Cli, DrillConfig, Stage, problems};
use flashloop_engine::logging::{LoggingConfig, init_logging};
use flashloop_engine::window::{Runtime, RuntimeConfig};

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/TTF/DejaVuSerif.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Times New Roman.ttf",
    "C:\\Windows\\Fonts\\times.ttf",
];

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::default();
    if let Some(filter) = cli.log.clone() {
        logging = logging.with_filter(filter);
    }
    init_logging(logging);

    let config = DrillConfig::from(&cli);
    config.validate().context("invalid drill configuration")?;

    let mut rng = match config.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };
    let problems = problems::generate(&config.tables, &config.factors, config.num_problems, &mut rng);
    log::info!("drilling {} problems", problems.len());

    let mut stage = Stage::new();
    let report = queue_session(&mut stage, problems);

    let mut runtime = RuntimeConfig::default()
        .with_title("Multiplication drill")
        .with_size(640.0, 360.0);
    match load_font(cli.font.as_deref())? {
        Some(bytes) => runtime = runtime.with_font(bytes),
        None => log::warn!("no font found; pass --font to see text"),
    }

    Runtime::run(runtime, stage)?;

    match report.borrow().as_ref() {
        Some(report) => print!("{report}"),
        None => println!("drill not finished"),
    }
    Ok(())
}

fn load_font(path: Option<&Path>) -> Result<Option<Vec<u8>>> {
    if let Some(path) = path {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read font {}", path.display()))?;
        return Ok(Some(bytes));
    }
    Ok(SYSTEM_FONTS.iter().find_map(|p| std::fs::read(p).ok()))
}
