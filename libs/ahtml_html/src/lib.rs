//! Metainfo database for HTML elements, and serialisation primitives.

pub mod myfrom;
pub mod types;
pub mod env;
pub mod meta;
pub mod print;

use anyhow::{anyhow, Result};
use lazy_static::lazy_static;
use meta::{MetaDb, read_meta_db};

lazy_static! {
    static ref METADB: Result<MetaDb, String> =
        read_meta_db().map_err(|e| format!("{e:#}"));
}

/// Built-in elements, plus those from `HTML_META_DB_JSON_PATH` if
/// set. Read on first access; a failure is reported on every access.
pub fn metadb() -> Result<&'static MetaDb> {
    METADB.as_ref().map_err(|e| anyhow!("HTML meta db: {e}"))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_metadb() {
        let a = metadb().unwrap();
        let b = metadb().unwrap();
        assert!(std::ptr::eq(a, b));
        assert!(a.element("div").is_some());
    }
}
