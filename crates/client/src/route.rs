//! Request routing
//!
//! Turns a database binding plus an operation into an absolute URL:
//!
//! ```text
//! system:  {base}/docs/{key}
//! tenant:  {base}/databases/{name}/docs/{key}
//! ```
//!
//! The database name is validated here, when a request is actually built,
//! so a binding to a bad name only fails once it is used.
//!
//! Keys travel as path segments, and URL parsing collapses `.` and `..`
//! segments. A key containing one would reach the server as a different
//! key, so such keys are refused before anything is sent.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use tenantdb_core::DatabaseName;
use url::Url;

use crate::{Error, Result};

/// Characters escaped in a key. `/` is kept: it separates key segments.
const KEY_ENCODE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b';')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Characters escaped in a single path segment
const SEGMENT_ENCODE: &AsciiSet = &KEY_ENCODE.add(b'/');

/// Refuse keys the URL layer would rewrite
fn check_key(key: &str) -> Result<()> {
    match key.split('/').find(|segment| matches!(*segment, "." | "..")) {
        Some(segment) => Err(Error::InvalidKey {
            key: key.to_string(),
            reason: format!("'{}' is not allowed as a key segment", segment),
        }),
        None => Ok(()),
    }
}

/// A validated request target prefix
#[derive(Debug, Clone)]
pub(crate) struct Route {
    base: Url,
    database: Option<DatabaseName>,
}

impl Route {
    /// Resolve a binding against the server base address
    pub fn resolve(base: &Url, database: Option<&str>) -> Result<Route> {
        let database = match database {
            Some(name) => Some(
                DatabaseName::new(name).map_err(|e| Error::invalid_database_name(name, e))?,
            ),
            None => None,
        };
        Ok(Route {
            base: base.clone(),
            database,
        })
    }

    /// Bound database, `None` for the system database
    pub fn database(&self) -> Option<&str> {
        self.database.as_ref().map(DatabaseName::as_str)
    }

    /// `{db}/docs/{key}`
    pub fn document(&self, key: &str, query: &[(&str, String)]) -> Result<Url> {
        check_key(key)?;
        let tail = format!("docs/{}", utf8_percent_encode(key, KEY_ENCODE));
        Ok(self.build(&tail, query))
    }

    /// `{db}/docs`
    pub fn documents(&self, query: &[(&str, String)]) -> Url {
        self.build("docs", query)
    }

    /// `{db}/databases`
    pub fn databases(&self, query: &[(&str, String)]) -> Url {
        self.build("databases", query)
    }

    fn build(&self, tail: &str, query: &[(&str, String)]) -> Url {
        let mut path = self.base.path().trim_end_matches('/').to_string();
        if let Some(db) = &self.database {
            path.push_str("/databases/");
            path.extend(utf8_percent_encode(db.as_str(), SEGMENT_ENCODE));
        }
        path.push('/');
        path.push_str(tail);

        let mut url = self.base.clone();
        url.set_path(&path);
        url.set_query(None);
        url.set_fragment(None);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in query {
                pairs.append_pair(name, value);
            }
        }
        url
    }
}
