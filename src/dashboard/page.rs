//! Defines the route handler for the dashboard page.

use axum::{extract::State, http::StatusCode, response::Response};
use maud::{Markup, html};
use time::macros::format_description;

use crate::{
    endpoints,
    service::ExpenseService,
    transaction::Transaction,
    view_templates::{
        BUTTON_DELETE_STYLE, CATEGORY_BADGE_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency, render,
    },
};

use super::aggregation::{CategoryTotal, category_breakdown, total_spent};

/// Renders the dashboard page.
pub async fn get_dashboard_page(State(service): State<ExpenseService>) -> Response {
    let transactions = service.all();

    render(StatusCode::OK, dashboard_view(&transactions))
}

fn dashboard_view(transactions: &[Transaction]) -> Markup {
    let total = total_spent(transactions);
    let breakdown = category_breakdown(transactions);

    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-2xl space-y-6"
            {
                div class="flex items-center justify-between"
                {
                    h1 class="text-2xl font-bold" { "Outlay" }

                    a
                        href=(endpoints::NEW_EXPENSE_VIEW)
                        class="px-4 py-2 bg-blue-500 dark:bg-blue-600 hover:bg-blue-600 \
                            hover:dark:bg-blue-700 text-white rounded"
                    {
                        "+ Add Expense"
                    }
                }

                div class="p-6 bg-white rounded shadow dark:bg-gray-800"
                {
                    p class="text-sm text-gray-500 dark:text-gray-400" { "Total spent" }
                    p id="total-spent" class="text-3xl font-bold" { (format_currency(total)) }
                }

                @if !breakdown.is_empty() {
                    div class="p-6 bg-white rounded shadow dark:bg-gray-800 space-y-3"
                    {
                        h2 class="text-lg font-bold" { "By category" }

                        @for row in &breakdown {
                            (breakdown_row(row))
                        }
                    }
                }

                h2 class="text-lg font-bold" { "Recent transactions" }

                @if transactions.is_empty() {
                    p class="py-8 text-center text-gray-500 dark:text-gray-400"
                    {
                        "No transactions yet. Add one!"
                    }
                } @else {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "" }
                            }
                        }

                        tbody
                        {
                            @for transaction in transactions {
                                (transaction_row(transaction))
                            }
                        }
                    }
                }
            }
        }
    };

    base("Dashboard", &content)
}

fn breakdown_row(row: &CategoryTotal) -> Markup {
    html! {
        div
        {
            div class="flex justify-between text-sm mb-1"
            {
                span class=(CATEGORY_BADGE_STYLE) { (row.category) }
                span { (format_currency(row.total)) " (" (row.percent) "%)" }
            }

            div class="w-full bg-gray-200 rounded-full h-2 dark:bg-gray-700"
            {
                div
                    class="bg-blue-500 h-2 rounded-full"
                    style=(format!("width: {}%", row.percent)) {}
            }
        }
    }
}

fn transaction_row(transaction: &Transaction) -> Markup {
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id);

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (format_date(transaction)) }
            td class=(TABLE_CELL_STYLE) { (transaction.description) }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE) { (transaction.category) }
            }
            td class=(TABLE_CELL_STYLE) { (format_currency(transaction.amount)) }
            td class=(TABLE_CELL_STYLE)
            {
                button
                    type="button"
                    hx-delete=(delete_url)
                    hx-target="closest tr"
                    hx-swap="outerHTML"
                    hx-target-error="#alert-container"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }
        }
    }
}

fn format_date(transaction: &Transaction) -> String {
    let format = format_description!("[month repr:short] [day], [year]");

    transaction
        .date
        .format(format)
        .unwrap_or_else(|_| transaction.date.date().to_string())
}
