use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use flowtada_core::{
    parse_event_script, replay, validate_login, ConfigOverrides, ControllerConfig,
};

#[derive(Parser, Debug)]
#[command(
    name = "flowtada-cli",
    about = "Kiểm tra logic tương tác của trang FlowTada ngoài trình duyệt."
)]
struct Args {
    /// File JSON cấu hình (các trường thiếu giữ mặc định).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Kiểm tra email/mật khẩu theo luật của form portal.
    Validate {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Phát lại kịch bản sự kiện JSON và in trạng thái sau từng bước.
    Replay {
        /// Đường dẫn tới file JSON chứa mảng sự kiện.
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ControllerConfig> {
    let overrides: Option<ConfigOverrides> = match path {
        Some(path) => {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("Không đọc được file {path:?}"))?;
            Some(
                serde_json::from_str(&data)
                    .with_context(|| format!("Config không hợp lệ: {path:?}"))?,
            )
        }
        None => None,
    };
    Ok(ControllerConfig::resolve(overrides)?)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Validate { email, password } => {
            if let Err(err) = validate_login(&email, &password, config.min_password_len) {
                bail!("{err}");
            }
            println!("ok");
        }
        Command::Replay { input } => {
            let data = std::fs::read_to_string(&input)
                .with_context(|| format!("Không đọc được file {input:?}"))?;
            let events = parse_event_script(&data)?;

            for (index, step) in replay(events, &config).into_iter().enumerate() {
                println!(
                    "#{index} {}\n    state: {}\n    effects: {}",
                    serde_json::to_string(&step.event)?,
                    serde_json::to_string(&step.state)?,
                    serde_json::to_string(&step.effects)?,
                );
            }
        }
    }

    Ok(())
}
