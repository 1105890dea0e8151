//! Course Portal - command-line front end

use course_portal::cli;

fn main() -> anyhow::Result<()> {
    // WARN level by default, use RUST_LOG=info for more
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into())
        )
        .with_writer(std::io::stderr)
        .init();

    cli::run()
}
