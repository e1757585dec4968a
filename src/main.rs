mod carousel;
mod cli;
mod config;
mod error;
mod gestures;
mod input;
mod layout;
mod logging;
mod page;
mod render;
mod replay;
mod tracker;
mod widget;

fn main() -> anyhow::Result<()> {
    logging::init();
    cli::run()
}
