//! Defines the route handler for the add-expense page.

use axum::{http::StatusCode, response::Response};
use maud::html;

use crate::{
    endpoints,
    view_templates::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        render,
    },
};

use super::form::{ExpenseFormValues, manual_expense_form};

/// Renders the page for recording a new expense.
///
/// The page has two halves: the AI helper, which posts free text to the
/// analyze endpoint and swaps the pre-filled manual form into place, and the
/// manual form itself. The analyze button is disabled while a request is in
/// flight.
pub async fn get_new_expense_page() -> Response {
    let content = html! {
        div class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "AI Helper" }

                form
                    hx-post=(endpoints::ANALYZE_API)
                    hx-target="#manual-entry"
                    hx-swap="outerHTML"
                    hx-target-error="#alert-container"
                    hx-disabled-elt="#analyze-button"
                    class="space-y-4"
                {
                    div
                    {
                        label for="text" class=(FORM_LABEL_STYLE)
                        {
                            "Describe the expense"
                        }

                        input
                            name="text"
                            id="text"
                            type="text"
                            placeholder="e.g., Dinner for $50"
                            required
                            autofocus
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    button
                        type="submit"
                        id="analyze-button"
                        class=(BUTTON_PRIMARY_STYLE)
                    {
                        "Analyze with AI"
                    }
                }

                hr class="border-gray-300 dark:border-gray-600";

                (manual_expense_form(&ExpenseFormValues::default()))

                a
                    href=(endpoints::DASHBOARD_VIEW)
                    class="block text-center text-sm text-blue-600 hover:text-blue-500 \
                        dark:text-blue-500 dark:hover:text-blue-400 underline"
                {
                    "Back to the dashboard"
                }
            }
        }
    };

    render(StatusCode::OK, base("Add Expense", &content))
}
