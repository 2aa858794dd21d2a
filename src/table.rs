//! Flattening to and from table-like sources.
//!
//! A [`Table`] is how spreadsheet-shaped data (CSV exports, dataframes)
//! meets the channel model: an index column of time values plus named
//! scalar columns. Multi-dimensional channels flatten to one column per
//! component with a bracketed suffix, `name[i]` for vectors of samples
//! with one trailing axis and `name[i,j]` beyond, indices row-major.
//! Folding back groups columns by base name and rebuilds the shaped
//! channel, with absent grid cells becoming NaN.

use crate::channel::Channel;
use crate::error::{Result, TimeSeriesError};
use crate::timeseries::TimeSeries;

/// A time-indexed collection of named scalar columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    index: Vec<f64>,
    columns: Vec<(String, Vec<f64>)>,
}

impl Table {
    /// Create a table with the given index and no columns.
    #[must_use]
    pub fn new(index: Vec<f64>) -> Self {
        Self {
            index,
            columns: Vec::new(),
        }
    }

    /// The index column (time values).
    #[must_use]
    pub fn index(&self) -> &[f64] {
        &self.index
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Add a column.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::ShapeMismatch`] if the column's
    /// length differs from the index, or
    /// [`TimeSeriesError::DuplicateKey`] on a repeated name.
    pub fn add_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        let name = name.into();
        if values.len() != self.index.len() {
            return Err(TimeSeriesError::shape_mismatch(
                &name,
                self.index.len(),
                values.len(),
            ));
        }
        if self.columns.iter().any(|(n, _)| *n == name) {
            return Err(TimeSeriesError::duplicate_key(name));
        }
        self.columns.push((name, values));
        Ok(())
    }

    /// Get a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    /// Iterate over `(name, values)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.columns.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }
}

/// Split `name[1,2]` into a base name and component indices. A column
/// without a well-formed bracket suffix is a plain scalar column.
fn parse_column_name(name: &str) -> (&str, Option<Vec<usize>>) {
    let Some(stripped) = name.strip_suffix(']') else {
        return (name, None);
    };
    let Some(open) = stripped.rfind('[') else {
        return (name, None);
    };
    let inside = &stripped[open + 1..];
    let indices: Option<Vec<usize>> = inside
        .split(',')
        .map(|part| part.trim().parse::<usize>().ok())
        .collect();
    match indices {
        Some(indices) if !indices.is_empty() => (&stripped[..open], Some(indices)),
        _ => (name, None),
    }
}

/// Format the bracket suffix for a flat component index over a
/// trailing shape.
fn column_suffix(flat: usize, trailing_shape: &[usize]) -> String {
    let mut indices = vec![0; trailing_shape.len()];
    let mut rem = flat;
    for (axis, &dim) in trailing_shape.iter().enumerate().rev() {
        indices[axis] = rem % dim;
        rem /= dim;
    }
    let parts: Vec<String> = indices.iter().map(ToString::to_string).collect();
    format!("[{}]", parts.join(","))
}

impl TimeSeries {
    /// Flatten every channel into scalar columns.
    ///
    /// One-dimensional channels become a plain column under the channel
    /// name; shaped channels one column per component, row-major.
    ///
    /// # Errors
    ///
    /// Returns the well-shapedness errors.
    pub fn to_table(&self) -> Result<Table> {
        self.check_well_shaped()?;
        let mut table = Table::new(self.time().to_vec());
        for (key, channel) in self.data().iter() {
            if channel.trailing_shape().is_empty() {
                table.add_column(key, channel.values().to_vec())?;
            } else {
                for c in 0..channel.width() {
                    let name = format!("{key}{}", column_suffix(c, channel.trailing_shape()));
                    table.add_column(name, channel.component(c))?;
                }
            }
        }
        Ok(table)
    }

    /// Fold a table's columns back into shaped channels.
    ///
    /// Bracket-suffixed columns sharing a base name are grouped; each
    /// axis is sized by the largest index seen and cells no column
    /// covers are NaN. Plain columns become one-dimensional channels.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::InvalidArgument`] if suffixed columns
    /// of one base name disagree on the number of axes, or
    /// [`TimeSeriesError::DuplicateKey`] if a base name collides with a
    /// plain column.
    pub fn from_table(table: &Table) -> Result<TimeSeries> {
        let mut ts = TimeSeries::from_time(table.index().to_vec());
        let n = table.len();

        // Base names in first-appearance order, each holding either a
        // plain column or the indexed components seen so far.
        let mut order: Vec<String> = Vec::new();
        let mut plain: Vec<(String, Vec<f64>)> = Vec::new();
        let mut grouped: Vec<(String, Vec<(Vec<usize>, Vec<f64>)>)> = Vec::new();

        for (name, values) in table.iter() {
            let (base, indices) = parse_column_name(name);
            match indices {
                None => {
                    if grouped.iter().any(|(b, _)| b == base) {
                        return Err(TimeSeriesError::duplicate_key(base));
                    }
                    order.push(base.to_string());
                    plain.push((base.to_string(), values.to_vec()));
                }
                Some(indices) => {
                    if plain.iter().any(|(b, _)| b == base) {
                        return Err(TimeSeriesError::duplicate_key(base));
                    }
                    match grouped.iter_mut().find(|(b, _)| b == base) {
                        Some((_, components)) => {
                            if components[0].0.len() != indices.len() {
                                return Err(TimeSeriesError::invalid_argument(format!(
                                    "columns of {base} disagree on the number of axes"
                                )));
                            }
                            components.push((indices, values.to_vec()));
                        }
                        None => {
                            order.push(base.to_string());
                            grouped.push((base.to_string(), vec![(indices, values.to_vec())]));
                        }
                    }
                }
            }
        }

        for base in order {
            if let Some(pos) = plain.iter().position(|(b, _)| *b == base) {
                let (_, values) = plain.swap_remove(pos);
                ts.data_mut().insert(base, Channel::from_vec(values));
                continue;
            }
            let pos = grouped
                .iter()
                .position(|(b, _)| *b == base)
                .ok_or_else(|| TimeSeriesError::key_not_found(base.clone()))?;
            let (_, components) = grouped.swap_remove(pos);

            let axes = components[0].0.len();
            let mut trailing_shape = vec![0usize; axes];
            for (indices, _) in &components {
                for (axis, &i) in indices.iter().enumerate() {
                    trailing_shape[axis] = trailing_shape[axis].max(i + 1);
                }
            }
            let width: usize = trailing_shape.iter().product();
            let mut columns = vec![vec![f64::NAN; n]; width];
            for (indices, values) in components {
                let mut flat = 0;
                for (axis, &i) in indices.iter().enumerate() {
                    flat = flat * trailing_shape[axis] + i;
                }
                columns[flat] = values;
            }
            ts.data_mut()
                .insert(base, Channel::from_components(&columns, &trailing_shape));
        }
        Ok(ts)
    }

    /// Whether the receiver's channels can round-trip through a table.
    /// Used internally by tests; kept public as a cheap structural
    /// check for table-backed workflows.
    ///
    /// # Errors
    ///
    /// Returns the well-shapedness errors.
    pub fn table_round_trips(&self) -> Result<bool> {
        let folded = TimeSeries::from_table(&self.to_table()?)?;
        Ok(self
            .data()
            .iter()
            .all(|(key, channel)| folded.data().get(key).is_some_and(|c| c.eq_nan(channel))))
    }
}
