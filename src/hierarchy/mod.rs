//! Hierarchy building from the territorial-codes CSV.
//!
//! The input is a flat CSV in which every data row describes one commune
//! together with its parent province and region:
//!
//! ```text
//! commune name, commune id, province name, province id, region name, region id
//! ```
//!
//! [`HierarchyBuilder`] consumes raw lines one at a time and accumulates three
//! deduplicated mappings keyed by the raw string identifiers. Regions and
//! provinces are first-write-wins (later rows repeating an id are no-ops);
//! communes are last-write-wins (a repeated commune id overwrites the earlier
//! record while keeping its original position). Iteration order of every
//! mapping is first-insertion order, which is why the maps are [`IndexMap`]s.
//!
//! Parent records are always inserted before or alongside their children from
//! the same row, so every commune's `provincia_id` resolves in the province
//! map and every province's `region_id` resolves in the region map.
//!
//! No quoting or escaping of embedded commas is supported; rows are split on
//! the literal comma.

use indexmap::IndexMap;
use tracing::warn;

/// A region, the top level of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub id: String,
    pub name: String,
}

/// A province, carrying a denormalized back-reference to its region.
///
/// The back-reference is a lookup convenience, not ownership; the region is
/// independently owned by the region map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Province {
    pub id: String,
    pub name: String,
    pub region_id: String,
    pub region_name: String,
}

/// A commune, the leaf level, with back-references to both ancestors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commune {
    pub id: String,
    pub name: String,
    pub provincia_id: String,
    pub provincia_name: String,
    pub region_id: String,
    pub region_name: String,
}

/// Dynamic field access for template rendering.
///
/// Each record type exposes its fields by key so `${_key}` placeholders can
/// be resolved at render time without reflection. Unknown keys return `None`.
pub trait RecordFields {
    /// Look up a field value by its placeholder key.
    fn field(&self, key: &str) -> Option<&str>;

    /// The record's display name, the only field the escape table applies to.
    fn name(&self) -> &str;
}

impl RecordFields for Region {
    fn field(&self, key: &str) -> Option<&str> {
        match key {
            "id" => Some(&self.id),
            "name" => Some(&self.name),
            _ => None,
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl RecordFields for Province {
    fn field(&self, key: &str) -> Option<&str> {
        match key {
            "id" => Some(&self.id),
            "name" => Some(&self.name),
            "regionId" => Some(&self.region_id),
            "regionName" => Some(&self.region_name),
            _ => None,
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl RecordFields for Commune {
    fn field(&self, key: &str) -> Option<&str> {
        match key {
            "id" => Some(&self.id),
            "name" => Some(&self.name),
            "provinciaId" => Some(&self.provincia_id),
            "provinciaName" => Some(&self.provincia_name),
            "regionId" => Some(&self.region_id),
            "regionName" => Some(&self.region_name),
            _ => None,
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// The complete deduplicated hierarchy, handed to the renderer by value once
/// the input is exhausted. Never mutated after [`HierarchyBuilder::finish`].
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    pub regiones: IndexMap<String, Region>,
    pub provincias: IndexMap<String, Province>,
    pub comunas: IndexMap<String, Commune>,
}

/// Accumulates CSV lines into a [`Hierarchy`].
///
/// The accumulation phase and the completion boundary are explicit: feed
/// every line (header first) through [`add_line`](Self::add_line), then call
/// [`finish`](Self::finish) once end-of-input is observed.
///
/// The builder itself never fails; line-source errors belong to the I/O
/// layer driving it.
#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    hierarchy: Hierarchy,
    header_seen: bool,
    line_no: usize,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one raw CSV line.
    ///
    /// The first line is the header row and is discarded without parsing.
    /// Data rows are split on `','` into six positional fields; a short row
    /// is kept permissively with missing fields as empty strings, and a
    /// warning names the offending line. Fields beyond the sixth are ignored.
    pub fn add_line(&mut self, line: &str) {
        self.line_no += 1;

        if !self.header_seen {
            self.header_seen = true;
            return;
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 6 {
            warn!(
                line = self.line_no,
                found = fields.len(),
                "row has fewer than 6 fields, missing values treated as empty"
            );
        }
        let field = |i: usize| fields.get(i).copied().unwrap_or("").to_string();

        let comuna_name = field(0);
        let comuna_id = field(1);
        let provincia_name = field(2);
        let provincia_id = field(3);
        let region_name = field(4);
        let region_id = field(5);

        self.hierarchy
            .regiones
            .entry(region_id.clone())
            .or_insert_with(|| Region {
                id: region_id.clone(),
                name: region_name.clone(),
            });

        self.hierarchy
            .provincias
            .entry(provincia_id.clone())
            .or_insert_with(|| Province {
                id: provincia_id.clone(),
                name: provincia_name.clone(),
                region_id: region_id.clone(),
                region_name: region_name.clone(),
            });

        // Last write wins for communes; IndexMap keeps the original slot.
        self.hierarchy.comunas.insert(
            comuna_id.clone(),
            Commune {
                id: comuna_id,
                name: comuna_name,
                provincia_id,
                provincia_name,
                region_id,
                region_name,
            },
        );
    }

    /// Signal end-of-input and hand over the accumulated hierarchy.
    pub fn finish(self) -> Hierarchy {
        self.hierarchy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(lines: &[&str]) -> Hierarchy {
        let mut builder = HierarchyBuilder::new();
        for line in lines {
            builder.add_line(line);
        }
        builder.finish()
    }

    #[test]
    fn header_row_is_discarded() {
        let hierarchy = build(&["name,id,provName,provId,regName,regId"]);
        assert!(hierarchy.regiones.is_empty());
        assert!(hierarchy.provincias.is_empty());
        assert!(hierarchy.comunas.is_empty());
    }

    #[test]
    fn regions_and_provinces_dedupe_first_write_wins() {
        let hierarchy = build(&[
            "header",
            "A,10,P1,1,R1,100",
            "B,20,P1 renamed,1,R1 renamed,100",
        ]);
        assert_eq!(hierarchy.regiones.len(), 1);
        assert_eq!(hierarchy.provincias.len(), 1);
        assert_eq!(hierarchy.regiones["100"].name, "R1");
        assert_eq!(hierarchy.provincias["1"].name, "P1");
    }

    #[test]
    fn communes_overwrite_last_write_wins() {
        let hierarchy = build(&[
            "header",
            "A,10,P1,1,R1,100",
            "B,20,P1,1,R1,100",
            "A later,10,P1,1,R1,100",
        ]);
        assert_eq!(hierarchy.comunas.len(), 2);
        assert_eq!(hierarchy.comunas["10"].name, "A later");
        // Overwriting keeps the first-insertion position.
        let ids: Vec<&str> = hierarchy.comunas.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["10", "20"]);
    }

    #[test]
    fn iteration_order_is_first_insertion() {
        let hierarchy = build(&[
            "header",
            "C1,1,PA,10,RX,200",
            "C2,2,PB,20,RY,100",
            "C3,3,PA,10,RX,200",
        ]);
        let region_ids: Vec<&str> = hierarchy.regiones.keys().map(String::as_str).collect();
        assert_eq!(region_ids, vec!["200", "100"]);
        let province_ids: Vec<&str> = hierarchy.provincias.keys().map(String::as_str).collect();
        assert_eq!(province_ids, vec!["10", "20"]);
    }

    #[test]
    fn short_row_fills_missing_fields_with_empty() {
        let hierarchy = build(&["header", "OnlyName,7"]);
        let commune = &hierarchy.comunas["7"];
        assert_eq!(commune.name, "OnlyName");
        assert_eq!(commune.provincia_id, "");
        assert_eq!(commune.region_id, "");
        // Parents still created, keyed by the empty id.
        assert!(hierarchy.provincias.contains_key(""));
        assert!(hierarchy.regiones.contains_key(""));
    }

    #[test]
    fn extra_fields_are_ignored() {
        let hierarchy = build(&["header", "A,10,P,1,R,100,extra,fields"]);
        assert_eq!(hierarchy.comunas["10"].region_id, "100");
    }

    #[test]
    fn commune_parents_resolve() {
        let hierarchy = build(&["header", "A,10,P1,1,R1,100"]);
        let commune = &hierarchy.comunas["10"];
        let province = &hierarchy.provincias[&commune.provincia_id];
        assert_eq!(province.region_id, "100");
        assert!(hierarchy.regiones.contains_key(&province.region_id));
    }

    #[test]
    fn record_fields_lookup() {
        let hierarchy = build(&["header", "A,10,P1,1,R1,100"]);
        let commune = &hierarchy.comunas["10"];
        assert_eq!(commune.field("name"), Some("A"));
        assert_eq!(commune.field("provinciaName"), Some("P1"));
        assert_eq!(commune.field("nope"), None);
        let region = &hierarchy.regiones["100"];
        assert_eq!(region.field("id"), Some("100"));
        assert_eq!(region.field("regionId"), None);
    }
}
