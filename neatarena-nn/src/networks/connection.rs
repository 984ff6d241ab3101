use std::fmt;

/// An incoming connection of a network node,
/// addressed by the source node's arena index.
#[derive(Clone, Copy, PartialEq)]
pub struct Connection {
    pub source: usize,
    pub weight: f32,
    pub enabled: bool,
}

impl Connection {
    /// Creates a new Connection from the specified
    /// source node, with the given weight and status.
    pub fn new(source: usize, weight: f32, enabled: bool) -> Connection {
        Connection {
            source,
            weight,
            enabled,
        }
    }

    /// Returns the connection's contribution given
    /// the current node values.
    pub fn signal(&self, values: &[f32]) -> f32 {
        if self.enabled {
            values[self.source] * self.weight
        } else {
            0.0
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.9}", self.source, self.weight)?;
        if !self.enabled {
            write!(f, " (off)")?;
        }
        Ok(())
    }
}
