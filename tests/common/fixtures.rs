use chrono::{NaiveDate, NaiveDateTime};
use paging_core::{
    ConfiguredQuery, FieldValue, InMemoryBackend, OrderingConfiguration, PageResult, QueryBuilder,
    Record,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ParentRecord {
    pub id: i64,
    pub name: String,
    pub group_key: Option<String>,
}

impl Record for ParentRecord {
    fn field(&self, path: &str) -> Option<FieldValue> {
        match path {
            "id" | "p.id" => Some(self.id.into()),
            "name" | "p.name" => Some(self.name.as_str().into()),
            "group_key" | "p.group_key" => Some(self.group_key.clone().into()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChildRecord {
    pub id: i64,
    pub name: String,
    pub parent: ParentRecord,
}

impl ChildRecord {
    /// `<parent name>.<child name>.<child id>`
    pub fn label(&self) -> String {
        format!("{}.{}.{}", self.parent.name, self.name, self.id)
    }
}

impl Record for ChildRecord {
    fn field(&self, path: &str) -> Option<FieldValue> {
        match path {
            "id" | "c.id" => Some(self.id.into()),
            "name" | "c.name" => Some(self.name.as_str().into()),
            "parent.id" | "p.id" => Some(self.parent.id.into()),
            "parent.name" | "p.name" => Some(self.parent.name.as_str().into()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DateTimeRecord {
    pub id: i64,
    pub created_at: NaiveDateTime,
}

impl Record for DateTimeRecord {
    fn field(&self, path: &str) -> Option<FieldValue> {
        match path {
            "id" | "d.id" => Some(self.id.into()),
            "created_at" | "d.created_at" => Some(self.created_at.into()),
            _ => None,
        }
    }
}

/// 30 parents `P0..P29` with ids 1..30; every `group_every`-th one has a group key
pub fn parents(group_every: usize) -> Vec<ParentRecord> {
    (0..30)
        .map(|index| ParentRecord {
            id: index as i64 + 1,
            name: format!("P{index}"),
            group_key: (index % group_every == 0).then(|| format!("group_{index}")),
        })
        .collect()
}

pub fn parent_backend() -> InMemoryBackend<ParentRecord> {
    InMemoryBackend::with_records(parents(10))
}

/// Parents ordered by id only, default direction
pub fn parent_query() -> ConfiguredQuery<ParentRecord> {
    ConfiguredQuery::new(QueryBuilder::new("parents p"))
        .add_ordering_configuration("id", OrderingConfiguration::with_path("p.id", "id"))
}

/// For parent index 1..9, five children named after `[i, 10 - i, i, 10 - i, i]`,
/// each with its own parent `P<i>` sharing the child's id
pub fn hierarchical_children() -> Vec<ChildRecord> {
    let mut children = Vec::new();
    for parent_index in 1..10 {
        let reverse_index = 10 - parent_index;
        for child_index in [
            parent_index,
            reverse_index,
            parent_index,
            reverse_index,
            parent_index,
        ] {
            let id = children.len() as i64 + 1;
            children.push(ChildRecord {
                id,
                name: format!("C{child_index}"),
                parent: ParentRecord {
                    id,
                    name: format!("P{parent_index}"),
                    group_key: None,
                },
            });
        }
    }
    children
}

pub fn child_query() -> ConfiguredQuery<ChildRecord> {
    ConfiguredQuery::new(
        QueryBuilder::new("children c").inner_join("parents p", "p.id = c.parent_id"),
    )
    .add_ordering_configurations([
        ("name", OrderingConfiguration::with_path("c.name", "name")),
        (
            "parent_name",
            OrderingConfiguration::with_path("p.name", "parent.name"),
        ),
        ("id", OrderingConfiguration::with_path("c.id", "id")),
    ])
}

/// 60 records, two per second starting at 2020-02-02 12:00:00
pub fn date_time_records() -> Vec<DateTimeRecord> {
    (0..60)
        .map(|index| DateTimeRecord {
            id: index + 1,
            created_at: NaiveDate::from_ymd_opt(2020, 2, 2)
                .and_then(|date| date.and_hms_opt(12, 0, (index / 2) as u32))
                .expect("valid fixture timestamp"),
        })
        .collect()
}

pub fn date_time_query() -> ConfiguredQuery<DateTimeRecord> {
    ConfiguredQuery::new(QueryBuilder::new("date_time_entities d")).add_ordering_configuration(
        "created_at",
        OrderingConfiguration::with_path("d.created_at", "created_at"),
    )
}

/// Expected page with string items and no total count
pub fn expected_page(
    items: &[&str],
    has_previous: bool,
    has_next: bool,
    previous_cursor: Option<&str>,
    next_cursor: Option<&str>,
) -> PageResult<String> {
    PageResult {
        items: items.iter().map(|item| item.to_string()).collect(),
        total_count: None,
        has_next,
        has_previous,
        next_cursor: next_cursor.map(str::to_string),
        previous_cursor: previous_cursor.map(str::to_string),
    }
}

pub fn parent_ids(page: PageResult<ParentRecord>) -> PageResult<String> {
    page.map_items(|parent| parent.id.to_string())
}
