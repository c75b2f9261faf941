//! Projected result of a window query

/// Values of one requested field, parallel to [`Window::timestamps`]
#[derive(Debug, Clone, PartialEq)]
pub struct Series<F> {
    /// The requested field
    pub field: F,
    /// One value per timestamp of the window
    pub values: Vec<f64>,
}

/// Time-ordered records of a window, projected onto the requested fields.
///
/// Series appear in the order the fields were requested and all share the one
/// timestamp sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Window<F> {
    /// Record timestamps, ascending
    pub timestamps: Vec<i64>,
    /// One series per requested field
    pub series: Vec<Series<F>>,
}

impl<F: Copy + PartialEq> Window<F> {
    pub(crate) fn with_fields(fields: &[F], capacity: usize) -> Self {
        Self {
            timestamps: Vec::with_capacity(capacity),
            series: fields
                .iter()
                .map(|&field| Series {
                    field,
                    values: Vec::with_capacity(capacity),
                })
                .collect(),
        }
    }

    /// Number of records in the window
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Values of a field, empty if the field was not requested
    pub fn values(&self, field: F) -> &[f64] {
        self.series
            .iter()
            .find(|s| s.field == field)
            .map(|s| s.values.as_slice())
            .unwrap_or(&[])
    }

    /// Timestamp of the oldest record
    pub fn first_timestamp(&self) -> Option<i64> {
        self.timestamps.first().copied()
    }

    /// Timestamp of the newest record
    pub fn last_timestamp(&self) -> Option<i64> {
        self.timestamps.last().copied()
    }
}
