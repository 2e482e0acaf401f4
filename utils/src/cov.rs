use std::{io::Write, path::Path};

use compress_io::compress::CompressIo;

use crate::{error::QcError, next_fields};

/// On disk a coverage signal is a tab separated file with one line per
/// uniquely mappable position: chromosome, 0-based position, depth.
/// Lines follow mask order so the depth column alone is the signal.

/// Write one coverage signal.  Existing files are overwritten, and the
/// content depends only on the sites iterator, so re-running a producer
/// with identical inputs gives byte-identical files.
pub fn write_coverage<I>(path: &Path, ctg: &str, sites: I) -> Result<(), QcError>
where
    I: Iterator<Item = (usize, u32)>,
{
    trace!("Writing coverage file {}", path.display());
    let mut wrt = CompressIo::new()
        .path(path)
        .bufwriter()
        .map_err(|e| QcError::OutputWrite {
            path: path.to_owned(),
            reason: e.to_string(),
        })?;

    for (pos, depth) in sites {
        writeln!(wrt, "{}\t{}\t{}", ctg, pos, depth).map_err(|e| QcError::OutputWrite {
            path: path.to_owned(),
            reason: e.to_string(),
        })?;
    }
    Ok(())
}

/// Read back the depth column of a coverage signal
pub fn read_coverage(path: &Path) -> Result<Vec<f64>, QcError> {
    let format_err = |line: usize, reason: String| QcError::CoverageFormat {
        path: path.to_owned(),
        reason: if line > 0 {
            format!("line {}: {}", line, reason)
        } else {
            reason
        },
    };

    trace!("Reading coverage file {}", path.display());
    let mut rdr = CompressIo::new()
        .path(path)
        .bufreader()
        .map_err(|e| format_err(0, e.to_string()))?;

    let mut buf = String::new();
    let mut line = 0;
    let mut depths = Vec::new();

    loop {
        let fields = match next_fields(&mut rdr, &mut buf) {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => return Err(format_err(line, e.to_string())),
        };
        line += 1;

        // Allow a trailing blank line
        if fields.len() == 1 && fields[0].is_empty() {
            continue;
        }
        if fields.len() < 3 {
            return Err(format_err(line, format!("expected 3 fields, found {}", fields.len())));
        }
        let depth = fields[2]
            .parse::<u32>()
            .map_err(|e| format_err(line, format!("bad depth value {:?}: {}", fields[2], e)))?;
        depths.push(depth as f64);
    }
    Ok(depths)
}
