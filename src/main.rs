mod app;
mod audio;
mod config;
mod error;
mod playlist;
mod quiz;
mod runtime;
mod tool;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
