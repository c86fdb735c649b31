//! Join module for tabstore
//!
//! This module implements inner equi-joins over row sequences. Rows are
//! compared with a nested loop, so each step costs |left| x |right|; there
//! are no indexes to consult.

use tracing::debug;

use crate::error::{TabError, TabResult};
use crate::row::Row;

/// Inner-join two row sequences on a shared column
///
/// For every left row (outer loop) and right row (inner loop) whose values
/// for `key` are both present and equal, the merged row is emitted with the
/// right row's fields taking precedence. Rows lacking the key never match,
/// not even each other.
pub fn join_pair(left: &[Row], right: &[Row], key: &str) -> Vec<Row> {
    let mut joined = Vec::new();

    for left_row in left {
        let Some(left_value) = left_row.get(key) else {
            continue;
        };
        for right_row in right {
            if right_row.get(key) == Some(left_value) {
                joined.push(left_row.merge(right_row));
            }
        }
    }

    joined
}

/// Join a chain of row sequences left to right
///
/// `operands[0]` is joined with `operands[1]` on `keys[0]`, then the result
/// with `operands[2]` on `keys[1]`, and so on. A key applies to the
/// accumulated row shape, so it may name a column merged in by an earlier step.
///
/// # Returns
/// * The joined rows, in left-row-major order
/// * `Err(TabError::InvalidJoin)` if there are fewer than two operands or the
///   key count is not one less than the operand count
pub fn join_chain(operands: &[&[Row]], keys: &[&str]) -> TabResult<Vec<Row>> {
    if operands.len() < 2 {
        return Err(TabError::InvalidJoin(format!(
            "at least two tables are required, got {}",
            operands.len()
        )));
    }
    if keys.len() != operands.len() - 1 {
        return Err(TabError::InvalidJoin(format!(
            "{} tables need {} join columns, got {}",
            operands.len(),
            operands.len() - 1,
            keys.len()
        )));
    }

    let mut joined = join_pair(operands[0], operands[1], keys[0]);
    debug!(key = keys[0], rows = joined.len(), "join step");

    for (right, key) in operands[2..].iter().zip(&keys[1..]) {
        joined = join_pair(&joined, right, key);
        debug!(key = *key, rows = joined.len(), "join step");
    }

    Ok(joined)
}
