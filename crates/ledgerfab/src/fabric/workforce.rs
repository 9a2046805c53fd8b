//! Monthly hires and terminations.

use chrono::{Datelike, NaiveDate};

use super::reference::{new_employee, ReferenceData};
use crate::calendar::CalendarDay;
use crate::config::{Span, WorkforceConfig};
use crate::error::FabricResult;
use crate::models::{ActionType, Employee, EmployeeAction};
use crate::random::FabricRng;
use crate::registry::ReferenceTable;

const TERMINATION_REASONS: &[&str] = &["RESIGNATION", "LAYOFF", "RETIREMENT", "PERFORMANCE"];

/// Generates personnel actions and keeps the employee table current.
#[derive(Debug)]
pub struct WorkforceSynthesizer<'a> {
    config: &'a WorkforceConfig,
    reference: &'a ReferenceData,
    next_action: u64,
}

impl<'a> WorkforceSynthesizer<'a> {
    /// Create a synthesizer. Hires draw cost centers and companies from
    /// `reference`.
    pub fn new(config: &'a WorkforceConfig, reference: &'a ReferenceData) -> Self {
        Self {
            config,
            reference,
            next_action: 1,
        }
    }

    fn draw(
        span: Span<u32>,
        peak: Span<u32>,
        peak_months: &[u32],
        month: u32,
        rng: &mut FabricRng,
    ) -> usize {
        let span = if peak_months.contains(&month) { peak } else { span };
        rng.range(span.min..=span.max) as usize
    }

    /// Post terminations and hires when `day` is a month start on a
    /// business day.
    pub fn post_day(
        &mut self,
        day: &CalendarDay,
        employees: &mut Vec<Employee>,
        actions: &mut Vec<EmployeeAction>,
        rng: &mut FabricRng,
    ) -> FabricResult<()> {
        if !day.is_month_start() || day.is_weekend {
            return Ok(());
        }
        let cfg = self.config;
        let month = day.date_key.month();
        let terminations = Self::draw(
            cfg.terminations,
            cfg.peak_terminations,
            &cfg.termination_peak_months,
            month,
            rng,
        );
        let hires = Self::draw(cfg.hires, cfg.peak_hires, &cfg.hire_peak_months, month, rng);

        self.terminate(day.date_key, terminations, employees, actions, rng)?;
        self.hire(day.date_key, hires, employees, actions, rng);
        Ok(())
    }

    fn action(
        &mut self,
        employee: &Employee,
        action_type: ActionType,
        date: NaiveDate,
        reason: &'static str,
    ) -> EmployeeAction {
        let id = self.next_action;
        self.next_action += 1;
        let (org_unit_old, org_unit_new, position_old, position_new) = match action_type {
            ActionType::Hire => (
                None,
                Some(employee.organizational_unit.clone()),
                None,
                Some(employee.job_title),
            ),
            ActionType::Terminate => (
                Some(employee.organizational_unit.clone()),
                None,
                Some(employee.job_title),
                None,
            ),
        };
        EmployeeAction {
            action_id: id,
            employee_id: employee.employee_id.clone(),
            action_type,
            action_date: date,
            action_reason: reason,
            org_unit_old,
            org_unit_new,
            position_old,
            position_new,
        }
    }

    /// Terminate `count` distinct active employees.
    fn terminate(
        &mut self,
        date: NaiveDate,
        count: usize,
        employees: &mut [Employee],
        actions: &mut Vec<EmployeeAction>,
        rng: &mut FabricRng,
    ) -> FabricResult<()> {
        let active: Vec<usize> = employees
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_active())
            .map(|(i, _)| i)
            .collect();
        for pick in rng.sample_indices(active.len(), count, ReferenceTable::Employee)? {
            let employee = &mut employees[active[pick]];
            employee.end_date = Some(date);
            let reason = rng.choose(TERMINATION_REASONS).unwrap_or("RESIGNATION");
            let row = self.action(employee, ActionType::Terminate, date, reason);
            actions.push(row);
        }
        Ok(())
    }

    fn hire(
        &mut self,
        date: NaiveDate,
        count: usize,
        employees: &mut Vec<Employee>,
        actions: &mut Vec<EmployeeAction>,
        rng: &mut FabricRng,
    ) {
        for _ in 0..count {
            let employee = new_employee(
                employees.len() + 1,
                date,
                &self.reference.cost_centers,
                &self.reference.companies,
                rng,
            );
            let row = self.action(&employee, ActionType::Hire, date, "NEW_HIRE");
            actions.push(row);
            employees.push(employee);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::FiscalYearStart;
    use crate::config::{FabricConfig, Profile};
    use crate::error::FabricError;
    use crate::fabric::ReferenceDataBuilder;
    use std::collections::HashSet;

    fn day(y: i32, m: u32, d: u32) -> CalendarDay {
        CalendarDay::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            FiscalYearStart::April,
        )
    }

    #[test]
    fn test_month_start_business_days_only() {
        let config = FabricConfig::for_profile(Profile::SalesPerformance).scaled(0.1);
        let mut rng = FabricRng::seeded(2);
        let mut data = ReferenceDataBuilder::new(&config).build(&mut rng).unwrap();
        let mut employees = std::mem::take(&mut data.employees);
        let mut synth = WorkforceSynthesizer::new(&config.workforce, &data);
        let mut actions = Vec::new();

        // 2023-01-01 is a Sunday, 2023-01-02 not a month start
        synth
            .post_day(&day(2023, 1, 1), &mut employees, &mut actions, &mut rng)
            .unwrap();
        synth
            .post_day(&day(2023, 1, 2), &mut employees, &mut actions, &mut rng)
            .unwrap();
        assert!(actions.is_empty());

        // 2023-02-01 is a Wednesday
        synth
            .post_day(&day(2023, 2, 1), &mut employees, &mut actions, &mut rng)
            .unwrap();
        let terminated = actions
            .iter()
            .filter(|a| a.action_type == ActionType::Terminate)
            .count();
        let hired = actions.len() - terminated;
        assert!((1..=4).contains(&terminated));
        assert!((4..=10).contains(&hired));
    }

    #[test]
    fn test_terminations_are_distinct_and_hires_unique() {
        let config = FabricConfig::for_profile(Profile::SalesPerformance).scaled(0.1);
        let mut rng = FabricRng::seeded(3);
        let mut data = ReferenceDataBuilder::new(&config).build(&mut rng).unwrap();
        let mut employees = std::mem::take(&mut data.employees);
        let initial = employees.len();
        let mut synth = WorkforceSynthesizer::new(&config.workforce, &data);
        let mut actions = Vec::new();
        for month in [3, 5, 6, 8, 11] {
            synth
                .post_day(&day(2023, month, 1), &mut employees, &mut actions, &mut rng)
                .unwrap();
        }

        let terminated: Vec<_> = actions
            .iter()
            .filter(|a| a.action_type == ActionType::Terminate)
            .map(|a| &a.employee_id)
            .collect();
        let unique: HashSet<_> = terminated.iter().collect();
        assert_eq!(unique.len(), terminated.len());

        let ids: HashSet<_> = employees.iter().map(|e| &e.employee_id).collect();
        assert_eq!(ids.len(), employees.len());
        assert_eq!(
            employees.len(),
            initial + actions.len() - terminated.len()
        );
        assert_eq!(
            employees.iter().filter(|e| !e.is_active()).count(),
            terminated.len()
        );
    }

    #[test]
    fn test_terminations_beyond_active_fail() {
        let mut config = FabricConfig::for_profile(Profile::SalesPerformance);
        config.workforce.terminations = Span::new(5, 5);
        let data = ReferenceData::default();
        let mut employees = Vec::new();
        let mut synth = WorkforceSynthesizer::new(&config.workforce, &data);
        let mut rng = FabricRng::seeded(1);
        let err = synth
            .post_day(&day(2023, 3, 1), &mut employees, &mut Vec::new(), &mut rng)
            .unwrap_err();
        assert!(matches!(
            err,
            FabricError::InsufficientReferences {
                table: ReferenceTable::Employee,
                requested: 5,
                available: 0
            }
        ));
    }
}
