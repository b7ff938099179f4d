use anyhow::Result;
use scanner_core::{config, factory, run_scanner};
use std::path::PathBuf;

// 每类特性最多选择一个
const BACKEND_COUNT: usize =
    cfg!(feature = "backend_mock") as usize + cfg!(feature = "backend_wpa_cli") as usize;
const _: () = assert!(
    BACKEND_COUNT <= 1,
    "Please select at most ONE radio backend feature: backend_mock, backend_wpa_cli."
);

const FS_COUNT: usize = cfg!(feature = "fs_embed") as usize + cfg!(feature = "fs_disk") as usize;
const _: () = assert!(
    FS_COUNT <= 1,
    "Please select at most ONE filesystem feature: fs_embed, fs_disk."
);

#[tokio::main]
async fn main() -> Result<()> {
    // 1. 初始化日志，默认 info 级别
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // 2. 加载配置：第一个参数可指定覆盖用的 TOML 文件
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = config::load_config(config_path.as_deref())?;

    // 3. 在编译时决定的实现中实例化无线电与文件系统
    let radio = factory::create_radio(&config);
    let fs = factory::create_filesystem(&config);

    if let Err(e) = run_scanner(&config, radio, fs).await {
        tracing::error!("❌ Scanner failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
