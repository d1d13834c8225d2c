//! Statement-level handling: tokenizing, locating the WHERE clause and
//! splicing a rebuilt one back in.

pub mod locator;
pub mod reconstruct;
pub mod tokens;

pub use locator::{insertion_point, locate_where, locate_where_lenient, WhereClause};
pub use reconstruct::{build_where_clause, reconstruct_query, render_condition, ReconstructPath};
