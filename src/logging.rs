use env_logger::{Builder, Env};
use std::io::Write;

/// Install the global logger. `RUST_LOG` overrides the default `info` filter.
pub fn init() {
    let env = Env::default().default_filter_or("info");
    let installed = Builder::from_env(env)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {:<5} {}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init();
    if let Err(e) = installed {
        log::warn!("logger already installed: {e}");
    }
}
