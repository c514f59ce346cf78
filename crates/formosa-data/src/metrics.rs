//! Metric vocabulary used in the `type` column of raw records.
//!
//! Names follow the data provider's English statement codes. Only the metrics
//! read by the rule sets are listed; any other `type` value still becomes a
//! column of the wide table.

/// Column names shared by raw and wide tables.
pub mod columns {
    /// Period-end date (`YYYY-MM-DD`)
    pub const DATE: &str = "date";

    /// Stable stock identifier
    pub const STOCK_ID: &str = "stock_id";

    /// Display name of the stock
    pub const STOCK_NAME: &str = "stock_name";

    /// Free-text industry label
    pub const INDUSTRY: &str = "industry";

    /// Metric name in long format
    pub const TYPE: &str = "type";

    /// Metric value in long format
    pub const VALUE: &str = "value";
}

/// Balance sheet metrics
pub mod balance_sheet {
    /// Cash and cash equivalents
    pub const CASH: &str = "CashAndCashEquivalents";

    /// Short-term borrowings
    pub const SHORT_TERM_BORROWINGS: &str = "ShorttermBorrowings";

    /// Long-term borrowings
    pub const LONG_TERM_BORROWINGS: &str = "LongtermBorrowings";

    /// Total equity
    pub const EQUITY: &str = "Equity";

    /// Retained earnings
    pub const RETAINED_EARNINGS: &str = "RetainedEarnings";

    /// Total liabilities
    pub const TOTAL_LIABILITIES: &str = "TotalLiabilities";
}

/// Income statement metrics
pub mod income_statement {
    /// Revenue
    pub const REVENUE: &str = "Revenue";

    /// Gross profit
    pub const GROSS_PROFIT: &str = "GrossProfit";

    /// Operating income
    pub const OPERATING_INCOME: &str = "OperatingIncome";

    /// Interest expense
    pub const INTEREST_EXPENSE: &str = "InterestExpense";

    /// Income after taxes
    pub const INCOME_AFTER_TAXES: &str = "IncomeAfterTaxes";

    /// Pre-tax income
    pub const PRE_TAX_INCOME: &str = "PreTaxIncome";

    /// Income tax
    pub const TAX: &str = "TAX";

    /// Earnings per share
    pub const EPS: &str = "EPS";
}

/// Cash flow statement metrics
pub mod cash_flow {
    /// Cash flows from operating activities
    pub const OPERATING_CASH_FLOW: &str = "CashFlowsFromOperatingActivities";

    /// Purchase of property, plant and equipment (capital expenditure)
    pub const CAPEX: &str = "PropertyAndPlantAndEquipment";

    /// Proceeds from long-term debt
    pub const PROCEEDS_FROM_LONG_TERM_DEBT: &str = "ProceedsFromLongTermDebt";

    /// Repayment of long-term debt
    pub const REPAYMENT_OF_LONG_TERM_DEBT: &str = "RepaymentOfLongTermDebt";
}
