use crate::domain::PolygonRow;
use std::collections::HashMap;

/// Polygon ID that owns the most vertex rows.
///
/// Ties go to the smallest ID. `None` for an empty table.
pub fn most_common_id(rows: &[PolygonRow]) -> Option<usize> {
    let mut counts: HashMap<usize, usize> = HashMap::new();
    for row in rows {
        *counts.entry(row.polygon).or_default() += 1;
    }

    counts
        .into_iter()
        .max_by(|(id_a, count_a), (id_b, count_b)| count_a.cmp(count_b).then(id_b.cmp(id_a)))
        .map(|(id, _)| id)
}

/// Drop every row of the most heavily sampled polygon.
///
/// In an export clipped to a region of interest, the polygon with the most
/// vertices is the region boundary itself rather than a lake.
///
/// # Returns
/// * The remaining rows in their original order, and the removed ID
pub fn remove_most_common_id(rows: Vec<PolygonRow>) -> (Vec<PolygonRow>, Option<usize>) {
    let Some(outlier) = most_common_id(&rows) else {
        return (rows, None);
    };

    let kept = rows.into_iter().filter(|r| r.polygon != outlier).collect();
    (kept, Some(outlier))
}
