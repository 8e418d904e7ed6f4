//! OpenSSL-style `index.txt` rendering of the merged certificate view.

use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::types::{Certificate, Result};

/// Timestamp layout of the index file, e.g. `210623000000Z`
const INDEX_TIME_FORMAT: &str = "%y%m%d%H%M%SZ";

fn index_time(t: &DateTime<Utc>) -> String {
    t.format(INDEX_TIME_FORMAT).to_string()
}

/// Render one tab-separated line per certificate
pub fn render_index(certificates: &[Certificate]) -> String {
    let mut out = String::new();

    for cert in certificates {
        let (status, revoked) = match &cert.revoked {
            Some(t) => ("R", index_time(t)),
            None => ("V", String::new()),
        };

        // Writing into a String cannot fail
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}\tunknown\t/{}",
            status,
            index_time(&cert.expires),
            revoked,
            cert.serial,
            cert.subject
        );
    }

    out
}

/// Write the index file for `certificates` to `path`
pub async fn write_index(path: &Path, certificates: &[Certificate]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    tokio::fs::write(path, render_index(certificates)).await?;

    info!("Wrote {} entries to index file {}", certificates.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn certificate(serial: i64, revoked: Option<DateTime<Utc>>) -> Certificate {
        Certificate {
            serial,
            requester: format!("requester_{}", serial),
            subject: format!("sub_{}", serial),
            issued: Utc.with_ymd_and_hms(2020, 6, 23, 0, 0, 0).unwrap(),
            expires: Utc.with_ymd_and_hms(2021, 6, 23, 0, 0, 0).unwrap(),
            revoked,
        }
    }

    #[test]
    fn test_render_index() {
        let revoked = Utc.with_ymd_and_hms(2019, 10, 12, 7, 20, 50).unwrap();
        let index = render_index(&[certificate(1, None), certificate(2, Some(revoked))]);

        assert_eq!(
            index,
            "V\t210623000000Z\t\t1\tunknown\t/sub_1\n\
             R\t210623000000Z\t191012072050Z\t2\tunknown\t/sub_2\n"
        );
    }

    #[tokio::test]
    async fn test_write_index() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ocsp").join("index.txt");

        write_index(&path, &[certificate(1, None)]).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "V\t210623000000Z\t\t1\tunknown\t/sub_1\n");
    }
}
