//! The manual-entry expense form, shared between the add-expense page and
//! the analyze endpoint (which re-renders it pre-filled).

use maud::{Markup, html};

use crate::{
    category::{CATEGORIES, Category},
    endpoints,
    view_templates::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
    },
};

/// The values the manual-entry form is rendered with.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct ExpenseFormValues {
    /// Pre-filled description, empty for a blank form.
    pub(crate) description: String,
    /// Pre-filled amount, if any.
    pub(crate) amount: Option<f64>,
    /// Pre-selected category; `None` selects the first category.
    pub(crate) category: Option<Category>,
}

/// Render the manual-entry form, optionally pre-filled with values the AI
/// helper extracted.
pub(crate) fn manual_expense_form(values: &ExpenseFormValues) -> Markup {
    let selected = values.category.unwrap_or(CATEGORIES[0]);

    html! {
        form
            id="manual-entry"
            hx-post=(endpoints::TRANSACTIONS_API)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            h2 class="text-xl font-bold" { "Manual Entry" }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                input
                    name="description"
                    id="description"
                    type="text"
                    placeholder="Description"
                    required
                    value=(values.description)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    min="0.01"
                    placeholder="0.00"
                    required
                    value=[values.amount]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                select
                    name="category"
                    id="category"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for category in CATEGORIES {
                        option value=(category) selected[category == selected] { (category) }
                    }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Transaction" }
        }
    }
}
