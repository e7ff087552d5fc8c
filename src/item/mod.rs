/// This module provides the CSV object writer and its quoting rules.
pub mod csv;
