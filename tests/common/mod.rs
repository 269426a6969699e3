//! Common test utilities for integration tests
//!
//! Provides config fixtures written to temporary directories.

use std::path::PathBuf;
use tempfile::TempDir;

/// A complete, valid configuration tracking a stock through IEX.
#[allow(dead_code)]
pub const IEX_CONFIG: &str = "\
[Main]
currency = USD
stock = AAPL
crypto =
provider = IEX
display_width_pixels = 250
display_height_pixels = 122
display_diagonal_inches = 2.13
rotate_display = 180
loglevel = WARNING

[Outputs]
screen = inky
local = ./data/out.png

[Fonts]
ticker_size = 9

[Mascot]
static = ./resources/pixelcat/pixelcat_sleeping.png

[IEX]
token = %(IEX_TOKEN)s
";

/// A valid crypto configuration with no credentialed provider and no [Outputs].
#[allow(dead_code)]
pub const COINGECKO_CONFIG: &str = "\
[Main]
currency = EUR
crypto = ETH
provider = CoinGecko

[Fonts]

[Mascot]
";

/// Create a temporary directory for test isolation
///
/// Returns a TempDir that will be cleaned up when dropped.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Write `contents` to `config.ini` in a fresh temp directory.
///
/// Keep the returned TempDir alive for as long as the path is used.
pub fn write_config(contents: &str) -> (TempDir, PathBuf) {
    let dir = temp_dir();
    let path = dir.path().join("config.ini");
    std::fs::write(&path, contents).expect("Failed to write config fixture");
    (dir, path)
}
