use serde::{Deserialize, Serialize};

/// Comparison operators usable in filter and boundary conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    Eq,
    NotEq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
}

impl ComparisonOperator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ComparisonOperator::Eq => "=",
            ComparisonOperator::NotEq => "<>",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Gte => ">=",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Lte => "<=",
            ComparisonOperator::Like => "LIKE",
        }
    }

    /// Strict comparison in the given direction, `>` when ascending
    pub fn seek(ascending: bool, inclusive: bool) -> Self {
        match (ascending, inclusive) {
            (true, false) => ComparisonOperator::Gt,
            (true, true) => ComparisonOperator::Gte,
            (false, false) => ComparisonOperator::Lt,
            (false, true) => ComparisonOperator::Lte,
        }
    }
}

/// Represents different types of SQL conditions
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Simple {
        field: String,
        operator: ComparisonOperator,
        value: serde_json::Value,
    },
    In {
        field: String,
        values: Vec<serde_json::Value>,
    },
    IsNull {
        field: String,
    },
    IsNotNull {
        field: String,
    },
    /// Parenthesised sub-clause, used for OR-of-AND boundary predicates
    Group(WhereClause),
    Raw {
        sql: String,
    },
}

impl Condition {
    pub fn simple(field: &str, operator: ComparisonOperator, value: serde_json::Value) -> Self {
        Condition::Simple {
            field: field.to_string(),
            operator,
            value,
        }
    }

    /// Convert condition to SQL string
    pub fn to_sql(&self) -> String {
        match self {
            Condition::Simple {
                field,
                operator,
                value,
            } => {
                format!("{} {} {}", field, operator.as_sql(), format_value(value))
            }
            Condition::In { field, values } => {
                let value_list = values
                    .iter()
                    .map(format_value)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{field} IN ({value_list})")
            }
            Condition::IsNull { field } => {
                format!("{field} IS NULL")
            }
            Condition::IsNotNull { field } => {
                format!("{field} IS NOT NULL")
            }
            Condition::Group(clause) => clause.to_sql(),
            Condition::Raw { sql } => sql.clone(),
        }
    }
}

/// Represents a WHERE clause that can contain multiple conditions
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub conditions: Vec<Condition>,
    pub operator: LogicalOperator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

impl WhereClause {
    /// Create a simple WHERE clause with a single condition
    pub fn simple(field: &str, operator: ComparisonOperator, value: serde_json::Value) -> Self {
        Self {
            conditions: vec![Condition::simple(field, operator, value)],
            operator: LogicalOperator::And,
        }
    }

    /// Create WHERE IN clause
    pub fn in_condition(field: &str, values: Vec<serde_json::Value>) -> Self {
        Self {
            conditions: vec![Condition::In {
                field: field.to_string(),
                values,
            }],
            operator: LogicalOperator::And,
        }
    }

    /// Create WHERE IS NULL clause
    pub fn is_null(field: &str) -> Self {
        Self {
            conditions: vec![Condition::IsNull {
                field: field.to_string(),
            }],
            operator: LogicalOperator::And,
        }
    }

    /// Create WHERE IS NOT NULL clause
    pub fn is_not_null(field: &str) -> Self {
        Self {
            conditions: vec![Condition::IsNotNull {
                field: field.to_string(),
            }],
            operator: LogicalOperator::And,
        }
    }

    /// Create raw SQL condition
    pub fn raw(sql: &str) -> Self {
        Self {
            conditions: vec![Condition::Raw {
                sql: sql.to_string(),
            }],
            operator: LogicalOperator::And,
        }
    }

    /// Combine multiple conditions with AND
    pub fn and(conditions: Vec<Condition>) -> Self {
        Self {
            conditions,
            operator: LogicalOperator::And,
        }
    }

    /// Combine multiple conditions with OR
    pub fn or(conditions: Vec<Condition>) -> Self {
        Self {
            conditions,
            operator: LogicalOperator::Or,
        }
    }

    /// Convert to SQL string
    pub fn to_sql(&self) -> String {
        if self.conditions.is_empty() {
            return "1=1".to_string();
        }

        if self.conditions.len() == 1 {
            return self.conditions[0].to_sql();
        }

        let operator_str = match self.operator {
            LogicalOperator::And => " AND ",
            LogicalOperator::Or => " OR ",
        };

        let condition_sqls: Vec<String> = self.conditions.iter().map(|c| c.to_sql()).collect();

        format!("({})", condition_sqls.join(operator_str))
    }
}

/// Format a JSON value for SQL
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "NULL".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => format!("'{}'", s.replace('\'', "''")),
        _ => format!("'{}'", value.to_string().replace('\'', "''")),
    }
}
