//! Attendance reconciliation and Loss-of-Pay payroll engine
//!
//! This crate reconciles raw attendance punches and leave requests against
//! each employee's shift rule, classifies every calendar day, and turns the
//! monthly counts into payroll lines with a loss-of-pay deduction.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
