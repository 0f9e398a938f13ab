use clap::Parser;
use client::game::ClientGameState;
use client::input::{clicked_square, BoardLayout};
use client::network::Connection;
use client::rendering::Renderer;
use log::info;
use macroquad::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server WebSocket URL
    #[arg(short = 's', long, default_value = "ws://127.0.0.1:5001")]
    server: String,

    /// Window width
    #[arg(short = 'w', long, default_value = "640")]
    width: i32,

    /// Window height (no short flag to avoid conflict with --help)
    #[arg(long, default_value = "720")]
    height: i32,
}

fn window_conf() -> Conf {
    let args = Args::parse();
    Conf {
        window_title: "Checkers".to_owned(),
        window_width: args.width,
        window_height: args.height,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    info!("Connecting to: {}", args.server);
    info!("Click one of your pieces, then its destination");

    let connection = Connection::spawn(args.server);
    let renderer = Renderer::new();
    let mut state = ClientGameState::new();

    loop {
        for event in connection.poll() {
            state.handle_event(event);
        }

        let layout = BoardLayout::fit(screen_width(), screen_height());

        if let Some((row, col)) = clicked_square(&layout) {
            if let Some(request) = state.click(row, col) {
                if !connection.send(request) {
                    state.notice = Some("Not connected".to_string());
                }
            }
        }

        renderer.render(&state, &layout);
        next_frame().await;
    }
}
