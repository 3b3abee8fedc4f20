//! Defines the endpoint that turns free text into a pre-filled expense
//! form.

use axum::{Form, extract::State, http::StatusCode, response::Response};
use serde::Deserialize;

use crate::{
    extract::ExpenseAnalysis,
    service::ExpenseService,
    view_templates::{error_alert, render},
};

use super::form::{ExpenseFormValues, manual_expense_form};

/// The form data for an analysis request.
#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    /// The free-text expense entry, e.g. "Dinner for $50".
    pub text: String,
}

/// A route handler that analyzes a free-text expense entry and responds with
/// the manual-entry form pre-filled with the result.
///
/// No store is touched here; the user still has to save the form. On
/// failure the user is prompted to fill the form in manually, which is the
/// only user-visible failure path of the whole extraction flow.
pub async fn analyze_endpoint(
    State(service): State<ExpenseService>,
    Form(form): Form<AnalyzeForm>,
) -> Response {
    match service.analyze(&form.text).await {
        Ok(analysis) => render(StatusCode::OK, manual_expense_form(&form_values(analysis))),
        Err(error) => {
            tracing::warn!("could not analyze expense entry: {error}");
            render(
                StatusCode::UNPROCESSABLE_ENTITY,
                error_alert("Could not analyze.", "Please fill in the expense manually."),
            )
        }
    }
}

/// Map an analysis onto form values.
///
/// The extraction service does not constrain the category, so membership in
/// the fixed set is checked here: an unrecognised category leaves the form's
/// default selection in place.
fn form_values(analysis: ExpenseAnalysis) -> ExpenseFormValues {
    ExpenseFormValues {
        description: analysis.description,
        amount: Some(analysis.amount),
        category: analysis.category.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use crate::{category::Category, extract::ExpenseAnalysis};

    use super::form_values;

    #[test]
    fn recognised_category_is_preselected() {
        let analysis = ExpenseAnalysis {
            description: "Dinner".to_owned(),
            category: "Food".to_owned(),
            amount: 50.0,
        };

        let values = form_values(analysis);

        assert_eq!(values.description, "Dinner");
        assert_eq!(values.amount, Some(50.0));
        assert_eq!(values.category, Some(Category::Food));
    }

    #[test]
    fn unrecognised_category_falls_back_to_the_default() {
        let analysis = ExpenseAnalysis {
            description: "Vet visit".to_owned(),
            category: "Pets".to_owned(),
            amount: 120.0,
        };

        let values = form_values(analysis);

        assert_eq!(values.category, None, "unknown categories are not forced");
    }
}
