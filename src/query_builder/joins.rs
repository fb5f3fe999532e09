/// Join kinds the SQL backend renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
}

impl JoinType {
    pub fn to_sql(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
        }
    }
}

/// A joined relation, e.g. the parent of a paged child entity.
///
/// In-memory backends ignore joins: their records already carry the joined
/// values (see [`Record`](crate::models::Record)).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub join_type: JoinType,
    pub table: String,
    pub on_condition: String,
}

impl Join {
    pub fn inner(table: &str, on_condition: &str) -> Self {
        Self {
            join_type: JoinType::Inner,
            table: table.to_string(),
            on_condition: on_condition.to_string(),
        }
    }

    pub fn left(table: &str, on_condition: &str) -> Self {
        Self {
            join_type: JoinType::Left,
            table: table.to_string(),
            on_condition: on_condition.to_string(),
        }
    }

    pub fn to_sql(&self) -> String {
        format!(
            "{} {} ON {}",
            self.join_type.to_sql(),
            self.table,
            self.on_condition
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_join() {
        let join = Join::inner("parents p", "p.id = c.parent_id");
        assert_eq!(join.to_sql(), "INNER JOIN parents p ON p.id = c.parent_id");
    }

    #[test]
    fn test_left_join() {
        let join = Join::left("parents p", "p.id = c.parent_id");
        assert_eq!(join.to_sql(), "LEFT JOIN parents p ON p.id = c.parent_id");
    }
}
