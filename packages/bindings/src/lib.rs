use napi::Result as NapiResult;
use napi_derive::napi;

use mortgage_calc_core::closing_costs::jurisdiction::JurisdictionTables;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Mortgage
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_payment(input_json: String) -> NapiResult<String> {
    let input: mortgage_calc_core::mortgage::payment::LoanParameters =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        mortgage_calc_core::mortgage::payment::compute_payment(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn generate_schedule(input_json: String) -> NapiResult<String> {
    let input: mortgage_calc_core::mortgage::schedule::ScheduleInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = mortgage_calc_core::mortgage::schedule::generate_schedule(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(serde::Deserialize)]
struct AnalysisBindingInput {
    #[serde(flatten)]
    input: mortgage_calc_core::mortgage::analysis::MortgageAnalysisInput,
    #[serde(default)]
    tables: Option<JurisdictionTables>,
}

#[napi]
pub fn analyze_mortgage(input_json: String) -> NapiResult<String> {
    let binding_input: AnalysisBindingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = mortgage_calc_core::mortgage::analysis::analyze_mortgage_with_tables(
        &binding_input.input,
        &binding_input.tables.unwrap_or_default(),
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Closing costs
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
struct ClosingCostBindingInput {
    #[serde(flatten)]
    input: mortgage_calc_core::closing_costs::estimator::ClosingCostInput,
    #[serde(default)]
    tables: Option<JurisdictionTables>,
}

#[napi]
pub fn estimate_closing_costs(input_json: String) -> NapiResult<String> {
    let binding_input: ClosingCostBindingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = mortgage_calc_core::closing_costs::estimator::estimate_closing_costs_with_tables(
        &binding_input.input,
        &binding_input.tables.unwrap_or_default(),
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// The built-in jurisdiction tables, for display or as a template to edit.
#[napi]
pub fn jurisdiction_tables() -> NapiResult<String> {
    serde_json::to_string(&JurisdictionTables::default()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
struct RecordBindingInput {
    #[serde(flatten)]
    input: mortgage_calc_core::mortgage::analysis::MortgageAnalysisInput,
    #[serde(default)]
    tables: Option<JurisdictionTables>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    comments: Option<String>,
}

fn record_from_binding(
    binding_input: RecordBindingInput,
) -> mortgage_calc_core::MortgageResult<mortgage_calc_core::records::CalculationRecord> {
    let analysis = mortgage_calc_core::mortgage::analysis::analyze_mortgage_with_tables(
        &binding_input.input,
        &binding_input.tables.unwrap_or_default(),
    )?;
    mortgage_calc_core::records::CalculationRecord::from_analysis(
        &binding_input.input,
        &analysis.result,
        binding_input.notes,
        binding_input.comments,
    )
}

#[napi]
pub fn calculation_record(input_json: String) -> NapiResult<String> {
    let binding_input: RecordBindingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let record = record_from_binding(binding_input).map_err(to_napi_error)?;
    serde_json::to_string(&record).map_err(to_napi_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mortgage_calc_core::MortgageError;

    const TORONTO_PURCHASE: &str = r#"
        "home_price": "500000",
        "down_payment": "100000",
        "annual_interest_rate_pct": "5.25",
        "amortization_years": 25,
        "province": "ontario",
        "city": "toronto",
        "notes": "two parking spots"
    "#;

    #[test]
    fn test_record_without_tables_uses_defaults() {
        let binding_input: RecordBindingInput =
            serde_json::from_str(&format!("{{{}}}", TORONTO_PURCHASE)).unwrap();
        assert!(binding_input.tables.is_none());
        let record = record_from_binding(binding_input).unwrap();
        assert_eq!(record.notes.as_deref(), Some("two parking spots"));
    }

    #[test]
    fn test_record_honors_injected_tables() {
        // BC-only tables: an Ontario purchase has no provincial table to use.
        let mut tables = JurisdictionTables::default();
        tables.provincial.retain(|t| {
            t.province == mortgage_calc_core::closing_costs::jurisdiction::Province::Bc
        });
        let json = format!(
            "{{{}, \"tables\": {}}}",
            TORONTO_PURCHASE,
            serde_json::to_string(&tables).unwrap()
        );
        let binding_input: RecordBindingInput = serde_json::from_str(&json).unwrap();
        assert!(matches!(
            record_from_binding(binding_input),
            Err(MortgageError::UnknownJurisdiction(_))
        ));
    }
}
