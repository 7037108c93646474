use super::Vertex;
use crate::error::{DegenerateReason, LakeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A closed lake outline.
///
/// The ring is logically closed: the edge after the last vertex returns to
/// the first. Rings reconstructed from a raw export also repeat the first
/// point at the end, which simply adds a zero-length edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    id: usize,
    vertices: Vec<Vertex>,
}

impl Polygon {
    pub fn new(id: usize, vertices: Vec<Vertex>) -> Self {
        Self { id, vertices }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Same outline under a different ID
    pub fn renumbered(&self, id: usize) -> Self {
        Self {
            id,
            vertices: self.vertices.clone(),
        }
    }

    /// Number of vertices that differ by value
    pub fn distinct_vertex_count(&self) -> usize {
        self.vertices
            .iter()
            .map(Vertex::key)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Edges in ring order; the last one wraps back to vertex 0.
    pub fn edges(&self) -> impl Iterator<Item = (Vertex, Vertex)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Fail unless the outline has at least three distinct vertices.
    pub fn ensure_enough_vertices(&self) -> Result<()> {
        let distinct = self.distinct_vertex_count();
        if distinct < 3 {
            return Err(LakeError::DegeneratePolygon {
                id: self.id,
                reason: DegenerateReason::TooFewVertices { distinct },
            });
        }
        Ok(())
    }

    /// Flatten into one table row per vertex.
    pub fn rows(&self) -> impl Iterator<Item = PolygonRow> + '_ {
        self.vertices.iter().map(|v| PolygonRow {
            polygon: self.id,
            latitude: v.lat,
            longitude: v.lon,
        })
    }
}

/// One vertex of one polygon in the `Polygon,Latitude,Longitude` table layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolygonRow {
    #[serde(rename = "Polygon")]
    pub polygon: usize,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
}

/// Polygons keyed by ID, in the order they were first discovered.
#[derive(Debug, Clone, Default)]
pub struct PolygonCollection {
    polygons: Vec<Polygon>,
    index: HashMap<usize, usize>,
}

impl PolygonCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect already finalized polygons. A later polygon reusing an ID
    /// replaces the earlier one in place.
    pub fn from_polygons(polygons: impl IntoIterator<Item = Polygon>) -> Self {
        let mut collection = Self::new();
        for polygon in polygons {
            collection.insert(polygon);
        }
        collection
    }

    /// Group vertex rows by polygon ID.
    ///
    /// Rows are buffered per ID and only turned into polygons once every row
    /// has been seen, so no half-built outline escapes. With `max_count`, rows
    /// introducing a new ID past the limit are dropped while rows for
    /// already-known IDs keep accumulating.
    pub fn from_rows<'a>(
        rows: impl IntoIterator<Item = &'a PolygonRow>,
        max_count: Option<usize>,
    ) -> Self {
        let mut builder = PolygonBuilder::default();
        for row in rows {
            builder.push(row, max_count);
        }
        builder.finish()
    }

    fn insert(&mut self, polygon: Polygon) {
        match self.index.get(&polygon.id) {
            Some(&slot) => self.polygons[slot] = polygon,
            None => {
                self.index.insert(polygon.id, self.polygons.len());
                self.polygons.push(polygon);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Polygon> {
        self.polygons.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.polygons.iter().map(Polygon::id)
    }

    /// Look up a polygon, failing loudly when the ID is unknown.
    pub fn get(&self, id: usize) -> Result<&Polygon> {
        self.index
            .get(&id)
            .map(|&slot| &self.polygons[slot])
            .ok_or(LakeError::LookupMiss {
                kind: "polygon",
                id,
            })
    }

    /// All vertices of all polygons, grouped by polygon in discovery order.
    pub fn to_rows(&self) -> Vec<PolygonRow> {
        self.polygons.iter().flat_map(Polygon::rows).collect()
    }

    /// Append polygons from another collection under fresh sequential IDs
    /// starting after the current largest ID.
    pub fn extend_renumbered(&mut self, other: &PolygonCollection) {
        let mut next = self.ids().max().map_or(0, |max| max + 1);
        for polygon in other.iter() {
            self.insert(polygon.renumbered(next));
            next += 1;
        }
    }
}

impl<'a> IntoIterator for &'a PolygonCollection {
    type Item = &'a Polygon;
    type IntoIter = std::slice::Iter<'a, Polygon>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Growable per-ID vertex buffers awaiting finalization.
#[derive(Debug, Default)]
struct PolygonBuilder {
    buffers: Vec<(usize, Vec<Vertex>)>,
    slots: HashMap<usize, usize>,
}

impl PolygonBuilder {
    fn push(&mut self, row: &PolygonRow, max_count: Option<usize>) {
        let vertex = Vertex::new(row.latitude, row.longitude);
        if let Some(&slot) = self.slots.get(&row.polygon) {
            self.buffers[slot].1.push(vertex);
            return;
        }
        if max_count.is_some_and(|max| self.buffers.len() >= max) {
            return;
        }
        self.slots.insert(row.polygon, self.buffers.len());
        self.buffers.push((row.polygon, vec![vertex]));
    }

    fn finish(self) -> PolygonCollection {
        PolygonCollection::from_polygons(
            self.buffers
                .into_iter()
                .map(|(id, vertices)| Polygon::new(id, vertices)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(polygon: usize, latitude: f64, longitude: f64) -> PolygonRow {
        PolygonRow {
            polygon,
            latitude,
            longitude,
        }
    }

    fn triangle(id: usize) -> Polygon {
        Polygon::new(
            id,
            vec![
                Vertex::new(0.0, 0.0),
                Vertex::new(0.0, 1.0),
                Vertex::new(1.0, 0.0),
            ],
        )
    }

    #[test]
    fn test_edges_wrap_around() {
        let edges: Vec<_> = triangle(0).edges().collect();
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[2], (Vertex::new(1.0, 0.0), Vertex::new(0.0, 0.0)));
    }

    #[test]
    fn test_distinct_count_ignores_closing_point() {
        let mut vertices = triangle(0).vertices().to_vec();
        vertices.push(vertices[0]);
        assert_eq!(Polygon::new(0, vertices).distinct_vertex_count(), 3);
    }

    #[test]
    fn test_two_vertex_polygon_is_degenerate() {
        let p = Polygon::new(
            9,
            vec![
                Vertex::new(0.0, 0.0),
                Vertex::new(1.0, 1.0),
                Vertex::new(0.0, 0.0),
            ],
        );
        match p.ensure_enough_vertices() {
            Err(LakeError::DegeneratePolygon { id, reason }) => {
                assert_eq!(id, 9);
                assert_eq!(reason, DegenerateReason::TooFewVertices { distinct: 2 });
            }
            other => panic!("expected degenerate polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_from_rows_keeps_discovery_order() {
        let rows = vec![row(5, 1.0, 1.0), row(2, 2.0, 2.0), row(5, 3.0, 3.0)];
        let collection = PolygonCollection::from_rows(&rows, None);
        assert_eq!(collection.ids().collect::<Vec<_>>(), vec![5, 2]);
        assert_eq!(collection.get(5).unwrap().len(), 2);
    }

    #[test]
    fn test_max_count_limits_new_ids_only() {
        let rows = vec![
            row(0, 0.0, 0.0),
            row(1, 1.0, 1.0),
            row(2, 2.0, 2.0),
            row(1, 1.5, 1.5),
            row(0, 0.5, 0.5),
        ];
        let collection = PolygonCollection::from_rows(&rows, Some(2));
        assert_eq!(collection.len(), 2);
        assert!(collection.get(2).is_err());
        assert_eq!(collection.get(0).unwrap().len(), 2);
        assert_eq!(collection.get(1).unwrap().len(), 2);
    }

    #[test]
    fn test_lookup_miss() {
        let collection = PolygonCollection::from_polygons(vec![triangle(0)]);
        match collection.get(7) {
            Err(LakeError::LookupMiss { kind, id }) => {
                assert_eq!(kind, "polygon");
                assert_eq!(id, 7);
            }
            other => panic!("expected lookup miss, got {:?}", other),
        }
    }

    #[test]
    fn test_rows_round_trip_through_collection() {
        let collection = PolygonCollection::from_polygons(vec![triangle(0), triangle(1)]);
        let rows = collection.to_rows();
        assert_eq!(rows.len(), 6);
        let rebuilt = PolygonCollection::from_rows(&rows, None);
        assert_eq!(rebuilt.get(1).unwrap(), collection.get(1).unwrap());
    }

    #[test]
    fn test_extend_renumbered() {
        let mut merged = PolygonCollection::from_polygons(vec![triangle(0), triangle(3)]);
        let other = PolygonCollection::from_polygons(vec![triangle(0), triangle(1)]);
        merged.extend_renumbered(&other);
        assert_eq!(merged.ids().collect::<Vec<_>>(), vec![0, 3, 4, 5]);
    }
}
