//! Bracket text output and stream helpers.

use std::fmt::{self, Display};
use std::io::{Read, Write};
use std::str::FromStr;

use super::{Hierarchy, NodeId};
use crate::error::Result;

impl<T: Display> Hierarchy<T> {
    fn write_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId) -> fmt::Result {
        let node = &self.nodes[id.0];
        if let Some(v) = &node.value {
            return write!(f, "{}", v);
        }
        f.write_str("{")?;
        for (k, &sub) in node.subordinates.iter().enumerate() {
            if k > 0 {
                f.write_str(", ")?;
            }
            self.write_node(f, sub)?;
        }
        f.write_str("}")
    }

    /// Write the bracket text of the whole tree to `w`.
    pub fn write_to<W: Write>(&self, mut w: W) -> Result<()> {
        let text = self.to_string();
        w.write_all(text.as_bytes())?;
        w.flush()?;
        tracing::debug!(nodes = self.len(), bytes = text.len(), "wrote hierarchy");
        Ok(())
    }
}

/// Groups are written as `{a, b, c}` with `", "` between items; scalars use
/// their own `Display`, so `1.0_f64` prints as `1`.
impl<T: Display> Display for Hierarchy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(f, self.top)
    }
}

impl<T: FromStr> Hierarchy<T> {
    /// Read all of `r` and parse it as bracket text.
    pub fn read_from<R: Read>(mut r: R) -> Result<Self> {
        let mut text = String::new();
        r.read_to_string(&mut text)?;
        Self::parse(&text)
    }
}
