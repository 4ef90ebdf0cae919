use std::io::Write;

use env_logger::{Builder, Env};

/// Send diagnostics to stderr as "LEVEL message"; stdout stays free for reports.
///
/// Verbosity 0 logs at info, 1 at debug, 2+ at trace. `RUST_LOG` wins when set.
pub fn configure_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    Builder::from_env(Env::default().default_filter_or(level))
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            writeln!(
                buf,
                "{style}{}{style:#}\t{}",
                record.level(),
                record.args()
            )
        })
        .init();
}
