use sheetframe_engine::engine::Value;

use crate::error::{Result, SheetframeError};

/// Row or column labels, one or more levels deep.
///
/// Each label holds one value per level; `names` holds one optional name
/// per level.
#[derive(Clone, Debug, PartialEq)]
pub struct Index {
    names: Vec<Option<String>>,
    labels: Vec<Vec<Value>>,
}

impl Index {
    /// An unnamed integer index `0..len`.
    pub fn range(len: usize) -> Index {
        Index {
            names: vec![None],
            labels: (0..len).map(|i| vec![Value::Int(i as i64)]).collect(),
        }
    }

    /// A single-level index.
    pub fn from_values(name: Option<&str>, values: Vec<Value>) -> Index {
        Index {
            names: vec![name.map(str::to_string)],
            labels: values.into_iter().map(|v| vec![v]).collect(),
        }
    }

    /// Single-level text labels, e.g. column names.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Index {
        Self::from_values(None, names.iter().map(|n| Value::from(n.as_ref())).collect())
    }

    /// A multi-level index. Every label must have one value per name.
    pub fn multi(names: Vec<Option<String>>, labels: Vec<Vec<Value>>) -> Result<Index> {
        if names.is_empty() {
            return Err(SheetframeError::invalid("index", "an index needs at least one level"));
        }
        if let Some(pos) = labels.iter().position(|l| l.len() != names.len()) {
            return Err(SheetframeError::invalid(
                "index",
                format!(
                    "label {} has {} levels, expected {}",
                    pos,
                    labels[pos].len(),
                    names.len()
                ),
            ));
        }
        Ok(Index { names, labels })
    }

    pub fn nlevels(&self) -> usize {
        self.names.len()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn names(&self) -> &[Option<String>] {
        &self.names
    }

    pub fn set_names(&mut self, names: Vec<Option<String>>) -> Result<()> {
        if names.len() != self.nlevels() {
            return Err(SheetframeError::invalid(
                "index",
                format!("expected {} names, got {}", self.nlevels(), names.len()),
            ));
        }
        self.names = names;
        Ok(())
    }

    pub fn labels(&self) -> &[Vec<Value>] {
        &self.labels
    }

    pub fn get(&self, pos: usize) -> Option<&[Value]> {
        self.labels.get(pos).map(Vec::as_slice)
    }

    /// Values of one level, in label order.
    pub fn level(&self, level: usize) -> impl Iterator<Item = &Value> + '_ {
        self.labels.iter().filter_map(move |l| l.get(level))
    }

    /// Position of the first single-level label whose display text is `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.labels
            .iter()
            .position(|l| l.len() == 1 && l[0].to_string() == name)
    }
}

impl Default for Index {
    fn default() -> Self {
        Index::range(0)
    }
}
