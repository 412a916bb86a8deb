//! Batch payroll orchestration.
//!
//! Runs the per-employee pipeline (calendar, classification, aggregation,
//! payroll) across a roster for one month. Employees are independent: a
//! failure for one is recorded as a failed entry and never aborts the batch.
//! Only an invalid period aborts the whole run.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use chrono::NaiveDate;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::config::PolicyConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendancePunch, BatchTotals, Employee, EmployeeEntry, EmployeeOutcome, LeaveRequest,
    MonthlyAggregate, PayrollReport, YearMonth,
};

use super::aggregator::aggregate_month;
use super::calendar::{MonthCalendar, generate_calendar};
use super::classifier::{ClassifierOptions, DayRecords, classify_day};
use super::payroll::calculate_payroll;

/// Failure code for an employee whose task did not complete.
pub const INTERNAL_ERROR_CODE: &str = "INTERNAL_ERROR";

/// The raw records for a batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchInput {
    /// The roster, in report order.
    pub employees: Vec<Employee>,
    /// Attendance punches for any employees and dates.
    pub punches: Vec<AttendancePunch>,
    /// Leave requests for any employees and dates.
    pub leaves: Vec<LeaveRequest>,
}

/// One employee's records for one month.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeRecords {
    /// The employee.
    pub employee: Employee,
    /// Punches dated inside the month.
    pub punches: Vec<AttendancePunch>,
    /// Leave requests overlapping the month.
    pub leaves: Vec<LeaveRequest>,
}

impl BatchInput {
    /// Groups the records by active employee, in roster order.
    ///
    /// Records for employees not on the roster, punches dated outside the
    /// month and leave that does not touch the month are dropped. A repeated
    /// ID keeps its roster slot but all records go to the first one. Returns the
    /// grouped records and the number of inactive employees skipped.
    pub fn partition(self, month: YearMonth) -> (Vec<EmployeeRecords>, usize) {
        let (first, last) = (month.first_day(), month.last_day());
        let mut skipped_inactive = 0;
        let mut roster: Vec<EmployeeRecords> = Vec::with_capacity(self.employees.len());
        let mut positions: HashMap<String, usize> = HashMap::new();

        for employee in self.employees {
            if !employee.is_active() {
                skipped_inactive += 1;
                continue;
            }
            positions.entry(employee.id.clone()).or_insert(roster.len());
            roster.push(EmployeeRecords {
                employee,
                punches: Vec::new(),
                leaves: Vec::new(),
            });
        }

        for punch in self.punches.into_iter().filter(|p| month.contains(p.date)) {
            if let Some(records) = positions.get(&punch.employee_id).and_then(|&i| roster.get_mut(i)) {
                records.punches.push(punch);
            }
        }
        for leave in self.leaves.into_iter().filter(|l| l.overlaps(first, last)) {
            if let Some(records) = positions.get(&leave.employee_id).and_then(|&i| roster.get_mut(i)) {
                records.leaves.push(leave);
            }
        }

        (roster, skipped_inactive)
    }

    /// The records of one active employee for `month`, if on the roster.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateEmployee` if the ID appears on the active roster
    /// more than once.
    pub fn records_for(
        self,
        month: YearMonth,
        employee_id: &str,
    ) -> EngineResult<Option<EmployeeRecords>> {
        let (roster, _) = self.partition(month);
        let mut matching = roster.into_iter().filter(|r| r.employee.id == employee_id);
        let first = matching.next();
        let extra = matching.count();
        if extra > 0 {
            return Err(EngineError::DuplicateEmployee {
                employee_id: employee_id.to_string(),
                count: extra + 1,
            });
        }
        Ok(first)
    }
}

/// Stops a running batch from dispatching further employees.
///
/// Employees already dispatched run to completion; the rest are left out of
/// the report, which is marked cancelled.
#[derive(Debug, Clone, Default)]
pub struct BatchCancellation {
    cancelled: Arc<AtomicBool>,
}

impl BatchCancellation {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Returns true once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// The external store punches, leave and the roster are fetched from.
pub trait RecordSource: Send + Sync {
    /// The employee roster.
    fn employees(&self) -> impl Future<Output = EngineResult<Vec<Employee>>> + Send;

    /// Punches dated between `first` and `last` inclusive.
    fn punches(
        &self,
        first: NaiveDate,
        last: NaiveDate,
    ) -> impl Future<Output = EngineResult<Vec<AttendancePunch>>> + Send;

    /// Leave requests touching `first` to `last` inclusive.
    fn leaves(
        &self,
        first: NaiveDate,
        last: NaiveDate,
    ) -> impl Future<Output = EngineResult<Vec<LeaveRequest>>> + Send;
}

/// A [`RecordSource`] over records already in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    input: BatchInput,
}

impl InMemorySource {
    /// Wraps a set of records.
    pub fn new(input: BatchInput) -> Self {
        Self { input }
    }
}

impl RecordSource for InMemorySource {
    async fn employees(&self) -> EngineResult<Vec<Employee>> {
        Ok(self.input.employees.clone())
    }

    async fn punches(&self, first: NaiveDate, last: NaiveDate) -> EngineResult<Vec<AttendancePunch>> {
        Ok(self
            .input
            .punches
            .iter()
            .filter(|p| first <= p.date && p.date <= last)
            .cloned()
            .collect())
    }

    async fn leaves(&self, first: NaiveDate, last: NaiveDate) -> EngineResult<Vec<LeaveRequest>> {
        Ok(self
            .input
            .leaves
            .iter()
            .filter(|l| l.overlaps(first, last))
            .cloned()
            .collect())
    }
}

/// Computes one employee's entry for `month`.
///
/// # Errors
///
/// Returns `InvalidPeriod` only. Per-employee failures are returned as a
/// [`EmployeeOutcome::Failed`] entry.
pub fn compute_employee(
    policy: &PolicyConfig,
    month: YearMonth,
    records: &EmployeeRecords,
) -> EngineResult<EmployeeEntry> {
    let calendar = generate_calendar(month.year(), month.month(), &policy.rest_days)?;
    Ok(compute_on_calendar(policy, &calendar, records))
}

fn compute_on_calendar(
    policy: &PolicyConfig,
    calendar: &MonthCalendar,
    records: &EmployeeRecords,
) -> EmployeeEntry {
    let employee = &records.employee;
    let outcome = classify_month(policy, calendar, records).and_then(|aggregate| {
        let calculation = calculate_payroll(employee, &aggregate, &policy.payroll)?;
        Ok(EmployeeOutcome::Computed {
            line: calculation.line,
            aggregate,
            audit_steps: calculation.audit_steps,
        })
    });

    match outcome {
        Ok(outcome) => entry_for(employee, outcome),
        Err(err) => failed_entry(employee, &err),
    }
}

fn failed_entry(employee: &Employee, err: &EngineError) -> EmployeeEntry {
    warn!(
        employee_id = %employee.id,
        code = err.code(),
        error = %err,
        "Employee payroll could not be computed"
    );
    entry_for(
        employee,
        EmployeeOutcome::Failed {
            code: err.code().to_string(),
            message: err.to_string(),
        },
    )
}

fn classify_month(
    policy: &PolicyConfig,
    calendar: &MonthCalendar,
    records: &EmployeeRecords,
) -> EngineResult<MonthlyAggregate> {
    let employee = &records.employee;
    let rule = policy.resolve_shift(employee)?;
    let options = ClassifierOptions {
        data_available_from: policy.data_available_from,
    };

    let mut punches_by_date: BTreeMap<NaiveDate, Vec<&AttendancePunch>> = BTreeMap::new();
    for punch in records.punches.iter().filter(|p| p.employee_id == employee.id) {
        punches_by_date.entry(punch.date).or_default().push(punch);
    }
    let leaves: Vec<&LeaveRequest> = records
        .leaves
        .iter()
        .filter(|l| l.employee_id == employee.id)
        .collect();

    let days = calendar
        .days()
        .map(|day| {
            let punches = punches_by_date.get(&day.date).map(Vec::as_slice).unwrap_or(&[]);
            let covering: Vec<&LeaveRequest> =
                leaves.iter().copied().filter(|l| l.covers(day.date)).collect();
            let records = DayRecords {
                punches,
                leaves: &covering,
            };
            classify_day(&employee.id, day, &rule, records, options)
        })
        .collect::<EngineResult<Vec<_>>>()?;

    debug!(employee_id = %employee.id, days = days.len(), "Classified month");
    Ok(aggregate_month(&employee.id, calendar.month(), days))
}

fn entry_for(employee: &Employee, outcome: EmployeeOutcome) -> EmployeeEntry {
    EmployeeEntry {
        employee_id: employee.id.clone(),
        emp_name: employee.name.clone(),
        department: employee.department.clone(),
        shift_type: employee.shift_type.clone(),
        outcome,
    }
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Runs the payroll pipeline across a roster.
///
/// Employees are computed on blocking worker tasks, at most `concurrency`
/// at a time (the number of available cores by default). The report lists
/// entries in roster order whatever order the workers finish in.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use attendance_payroll::calculation::{BatchCancellation, BatchInput, PayrollBatch};
/// use attendance_payroll::config::PolicyConfig;
/// use attendance_payroll::models::YearMonth;
///
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// let batch = PayrollBatch::new(Arc::new(PolicyConfig::default()));
/// let month = YearMonth::new(2024, 6).unwrap();
///
/// let report = runtime
///     .block_on(batch.run(month, BatchInput::default(), &BatchCancellation::new()))
///     .unwrap();
/// assert!(report.entries.is_empty());
/// assert!(!report.cancelled);
/// ```
#[derive(Debug, Clone)]
pub struct PayrollBatch {
    policy: Arc<PolicyConfig>,
    concurrency: usize,
}

impl PayrollBatch {
    /// Creates a batch runner sized to the available cores.
    pub fn new(policy: Arc<PolicyConfig>) -> Self {
        Self {
            policy,
            concurrency: default_concurrency(),
        }
    }

    /// Overrides the number of employees computed at once (minimum 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// The policy employees are computed under.
    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Fetches the month's records from `source`, then runs the batch.
    pub async fn run_from_source<S: RecordSource>(
        &self,
        month: YearMonth,
        source: &S,
        cancel: &BatchCancellation,
    ) -> EngineResult<PayrollReport> {
        let (first, last) = (month.first_day(), month.last_day());
        let input = BatchInput {
            employees: source.employees().await?,
            punches: source.punches(first, last).await?,
            leaves: source.leaves(first, last).await?,
        };
        self.run(month, input, cancel).await
    }

    /// Computes every active employee in `input` for `month`.
    ///
    /// Only the first roster entry for an ID is computed; later entries with
    /// the same ID are reported as `DUPLICATE_EMPLOYEE` failures.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPeriod` if no calendar can be generated for `month`.
    pub async fn run(
        &self,
        month: YearMonth,
        input: BatchInput,
        cancel: &BatchCancellation,
    ) -> EngineResult<PayrollReport> {
        let start_time = Instant::now();
        let calendar = Arc::new(generate_calendar(
            month.year(),
            month.month(),
            &self.policy.rest_days,
        )?);
        let (roster, skipped_inactive) = input.partition(month);

        info!(
            month = %month,
            employees = roster.len(),
            skipped_inactive,
            concurrency = self.concurrency,
            "Starting payroll batch"
        );

        let mut occurrences: HashMap<String, usize> = HashMap::new();
        for records in &roster {
            *occurrences.entry(records.employee.id.clone()).or_default() += 1;
        }

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();
        let mut dispatched: Vec<Employee> = Vec::with_capacity(roster.len());
        let mut results: Vec<Option<EmployeeEntry>> = Vec::with_capacity(roster.len());
        let mut seen: HashSet<String> = HashSet::new();
        let mut cancelled = false;

        for records in roster {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            if !seen.insert(records.employee.id.clone()) {
                let err = EngineError::DuplicateEmployee {
                    employee_id: records.employee.id.clone(),
                    count: occurrences.get(&records.employee.id).copied().unwrap_or(2),
                };
                results.push(Some(failed_entry(&records.employee, &err)));
                dispatched.push(records.employee);
                continue;
            }
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                break;
            };
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let index = dispatched.len();
            dispatched.push(records.employee.clone());
            results.push(None);
            let policy = Arc::clone(&self.policy);
            let calendar = Arc::clone(&calendar);
            tasks.spawn_blocking(move || {
                let _permit = permit;
                (index, compute_on_calendar(&policy, &calendar, &records))
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, entry)) => {
                    if let Some(slot) = results.get_mut(index) {
                        *slot = Some(entry);
                    }
                }
                Err(e) => error!(error = %e, "Employee payroll task failed"),
            }
        }

        let entries: Vec<EmployeeEntry> = results
            .into_iter()
            .zip(&dispatched)
            .map(|(entry, employee)| {
                entry.unwrap_or_else(|| {
                    entry_for(
                        employee,
                        EmployeeOutcome::Failed {
                            code: INTERNAL_ERROR_CODE.to_string(),
                            message: "Payroll task did not complete".to_string(),
                        },
                    )
                })
            })
            .collect();

        let totals = BatchTotals::from_entries(&entries);
        info!(
            month = %month,
            employees = totals.total_employees,
            failed = totals.failed_employees,
            cancelled,
            total_net_salary = %totals.total_net_salary,
            duration_us = start_time.elapsed().as_micros(),
            "Payroll batch completed"
        );

        Ok(PayrollReport {
            month,
            entries,
            totals,
            cancelled,
            skipped_inactive,
        })
    }
}
