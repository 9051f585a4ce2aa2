//! One Verilog file per constant.
//!
//! Files are named `<prefix><index:03>.v`, where the index is the constant
//! masked to the table width (so `-1` lands in `mul255.v` for 8-bit constants).

use crate::core::GenResult;
use crate::emit::ModuleKind;
use crate::search::PlacementTable;
use std::fs;
use std::path::{Path, PathBuf};

/// Default output directory of the batch drivers.
pub const DEFAULT_OUTPUT_DIR: &str = "const_mul";

/// Path of the file holding constant `n`.
pub fn file_path(dir: &Path, kind: ModuleKind, table: &PlacementTable, n: i32) -> PathBuf {
    let index = table.context().masked(n);
    dir.join(format!("{}{:03}.v", kind.file_prefix(), index))
}

/// Write one module of `kind` for every constant in range into `dir`.
///
/// The directory is created if missing. Returns the number of files written.
pub fn write_batch(dir: &Path, kind: ModuleKind, table: &PlacementTable) -> GenResult<usize> {
    fs::create_dir_all(dir)?;

    let mut written = 0;
    for n in table.context().constants() {
        let mut text = String::new();
        kind.emit(table, n, &mut text)?;

        let path = file_path(dir, kind, table, n);
        log::debug!("Writing {} for {} to {}", kind, n, path.display());
        fs::write(&path, text)?;
        written += 1;
    }

    log::info!("Wrote {} {} files to {}", written, kind, dir.display());
    Ok(written)
}
