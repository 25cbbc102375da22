/// How a column's cells are stored and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    /// Stored as a plain number, displayed with the currency format.
    Currency,
    /// Plain number without a display format.
    Percentage,
    Status,
}

/// The fixed, ordered columns of the payment records sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    InvoiceNo,
    TaskType,
    TariffFee,
    GrossFee,
    VatRate,
    VatAmount,
    NetFee,
    CaseDetails,
    SubmissionDate,
    InvoiceDate,
    PaymentStatus,
}

pub const COLUMN_COUNT: usize = 11;

impl Column {
    /// All columns in sheet order.
    pub const ALL: [Column; COLUMN_COUNT] = [
        Column::InvoiceNo,
        Column::TaskType,
        Column::TariffFee,
        Column::GrossFee,
        Column::VatRate,
        Column::VatAmount,
        Column::NetFee,
        Column::CaseDetails,
        Column::SubmissionDate,
        Column::InvoiceDate,
        Column::PaymentStatus,
    ];

    /// Zero-based position of the column in the sheet.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn field_name(self) -> &'static str {
        match self {
            Column::InvoiceNo => "invoice_no",
            Column::TaskType => "task_type",
            Column::TariffFee => "tariff_fee",
            Column::GrossFee => "gross_fee",
            Column::VatRate => "vat_rate",
            Column::VatAmount => "vat_amount",
            Column::NetFee => "net_fee",
            Column::CaseDetails => "case_details",
            Column::SubmissionDate => "submission_date",
            Column::InvoiceDate => "invoice_date",
            Column::PaymentStatus => "payment_status",
        }
    }

    /// Header text written to the first row of the sheet.
    pub fn header(self) -> &'static str {
        match self {
            Column::InvoiceNo => "Invoice No",
            Column::TaskType => "Task Type",
            Column::TariffFee => "Tariff Fee",
            Column::GrossFee => "Gross Fee (TL)",
            Column::VatRate => "VAT (%)",
            Column::VatAmount => "VAT Amount (TL)",
            Column::NetFee => "Net Fee (TL)",
            Column::CaseDetails => "Case Details",
            Column::SubmissionDate => "Submission Date",
            Column::InvoiceDate => "Invoice Date",
            Column::PaymentStatus => "Payment Status",
        }
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            Column::TariffFee | Column::GrossFee | Column::VatAmount | Column::NetFee => {
                ColumnKind::Currency
            }
            Column::VatRate => ColumnKind::Percentage,
            Column::PaymentStatus => ColumnKind::Status,
            _ => ColumnKind::Text,
        }
    }

    pub fn is_currency(self) -> bool {
        self.kind() == ColumnKind::Currency
    }

    /// Whether cells in this column must hold a number.
    pub fn is_numeric(self) -> bool {
        matches!(self.kind(), ColumnKind::Currency | ColumnKind::Percentage)
    }

    pub fn headers() -> [&'static str; COLUMN_COUNT] {
        Column::ALL.map(Column::header)
    }
}
