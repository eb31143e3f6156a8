//! プロバイダーレジストリ
//!
//! 監視対象のプロバイダーとエンドポイントは静的設定で、起動時に一度だけ
//! 読み込まれ、以後プロセス終了まで変更されない。

use crate::common::error::{CommonError, CommonResult};
use crate::config::get_non_empty_env;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// プロバイダー配下の1エンドポイント
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderEndpoint {
    /// エンドポイントID（プロバイダー内で一意）
    pub id: String,
    /// 表示名
    pub name: String,
    /// ベースURLからの相対パス（クエリ文字列を含む）
    pub path: String,
}

impl ProviderEndpoint {
    /// 新しいエンドポイント定義を作成
    pub fn new(id: impl Into<String>, name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            path: path.into(),
        }
    }
}

/// 監視対象プロバイダー
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provider {
    /// プロバイダーID
    pub id: String,
    /// 表示名
    pub name: String,
    /// ベースURL
    pub base_url: String,
    /// エンドポイント一覧（設定順）
    pub endpoints: Vec<ProviderEndpoint>,
}

impl Provider {
    /// 新しいプロバイダー定義を作成
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        base_url: impl Into<String>,
        endpoints: Vec<ProviderEndpoint>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_url: base_url.into(),
            endpoints,
        }
    }

    /// エンドポイントの絶対URLを組み立てる
    pub fn endpoint_url(&self, endpoint: &ProviderEndpoint) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.path.trim_start_matches('/')
        )
    }
}

/// 不変のプロバイダーレジストリ
///
/// 設定順を保持しつつIDで引けるようにする。`Clone`は`Arc`の複製のみ。
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: Arc<[Arc<Provider>]>,
    index: Arc<HashMap<String, usize>>,
}

impl ProviderRegistry {
    /// プロバイダー一覧からレジストリを作成
    ///
    /// プロバイダーIDの重複、プロバイダー内のエンドポイントIDの重複、
    /// 空のベースURLは設定エラーとする。
    pub fn new(providers: Vec<Provider>) -> CommonResult<Self> {
        let mut index = HashMap::with_capacity(providers.len());
        for (i, provider) in providers.iter().enumerate() {
            if provider.base_url.trim().is_empty() {
                return Err(CommonError::Config(format!(
                    "provider '{}' has an empty base URL",
                    provider.id
                )));
            }
            if index.insert(provider.id.clone(), i).is_some() {
                return Err(CommonError::Config(format!(
                    "duplicate provider id '{}'",
                    provider.id
                )));
            }
            let mut seen = std::collections::HashSet::new();
            for endpoint in &provider.endpoints {
                if !seen.insert(endpoint.id.as_str()) {
                    return Err(CommonError::Config(format!(
                        "duplicate endpoint id '{}' in provider '{}'",
                        endpoint.id, provider.id
                    )));
                }
            }
        }

        Ok(Self {
            providers: providers.into_iter().map(Arc::new).collect(),
            index: Arc::new(index),
        })
    }

    /// 組み込みのVismaカタログから作成（ベースURLは環境変数で上書き可能）
    pub fn builtin() -> CommonResult<Self> {
        Self::new(builtin_providers(get_non_empty_env))
    }

    /// 全プロバイダー（設定順）
    pub fn list(&self) -> &[Arc<Provider>] {
        &self.providers
    }

    /// IDでプロバイダーを取得
    pub fn get(&self, id: &str) -> Option<&Arc<Provider>> {
        self.index.get(id).map(|&i| &self.providers[i])
    }

    /// プロバイダー数
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

type EndpointSpec = (&'static str, &'static str, &'static str);

const ERP_ENDPOINTS: &[EndpointSpec] = &[
    ("customers", "Customers", "/v1/customer?pagesize=1"),
    ("suppliers", "Suppliers", "/v1/supplier?pagesize=1"),
    ("invoices", "Customer Invoices", "/v1/customerInvoice?pagesize=1"),
    ("sales-orders", "Sales Orders", "/v1/salesorder?pagesize=1"),
    ("accounts", "Accounts", "/v1/account?pagesize=1"),
    ("attributes", "Attributes", "/v1/attribute?pagesize=1"),
    ("carriers", "Carriers", "/v1/carrier?pagesize=1"),
    ("cash-accounts", "Cash Accounts", "/v1/cashaccount?pagesize=1"),
    ("cash-sale", "Cash Sale", "/v1/cashsale?pagesize=1"),
    ("contact", "Contact", "/v1/contact?pagesize=1"),
    ("contract-template", "Contract Template", "/v1/contracttemplate?pagesize=1"),
    ("contract-usage", "Contract Usage", "/v1/contractusage?pagesize=1"),
    ("country", "Country", "/v1/country?pagesize=1"),
    ("credit-term", "Credit Term", "/v1/creditterm?pagesize=1"),
    ("currency", "Currency", "/v1/currency?pagesize=1"),
    ("currency-rate", "Currency Rate", "/v2/currencyrate?pagesize=1"),
    ("currency-rate-type", "Currency Rate Type", "/v2/currencyratetype?pagesize=1"),
    ("customer-contract", "Customer Contract", "/v1/customercontract?pagesize=1"),
    ("customer-credit-note", "Customer Credit Note", "/v1/customercreditnote?pagesize=1"),
    ("customer-credit-writeoff", "Customer Credit Write Off", "/v1/customercreditwriteoff?pagesize=1"),
    ("customer-debit-note", "Customer Debit Note", "/v1/customerdebitnote?pagesize=1"),
    ("customer-document", "Customer Document", "/v1/customerdocument?pagesize=1"),
    ("customer-overdue-charge", "Customer Overdue Charge", "/v1/customeroverduecharge?pagesize=1"),
    ("customer-payment", "Customer Payment", "/v1/customerpayment?pagesize=1"),
    ("customer-payment-method", "Customer Payment Method", "/v1/customerpaymentmethod?pagesize=1"),
    ("customer-sales-price", "Customer Sales Price", "/v1/customersalesprice?pagesize=1"),
    ("deferral-code", "Deferral Code", "/v1/deferralcode?pagesize=1"),
    ("department", "Department", "/v1/department?pagesize=1"),
    ("dimension", "Dimension", "/v1/dimension?pagesize=1"),
    ("discount-v2", "Discount V2", "/v2/discount?pagesize=1"),
    ("discount-code-v2", "Discount Code V2", "/v2/discountcode?pagesize=1"),
    ("earning-type", "Earning Type", "/v1/earningtype?pagesize=1"),
    ("employee", "Employee", "/v1/employee?pagesize=1"),
    ("expense-claim", "Expense Claim", "/v1/expenseclaim?pagesize=1"),
    ("expense-receipt", "Expense Receipt", "/v1/expensereceipt?pagesize=1"),
    ("financial-period", "Financial Period", "/v1/financialperiod?pagesize=1"),
    ("fixed-asset", "Fixed Asset", "/v1/fixedasset?pagesize=1"),
    ("fixed-asset-class", "Fixed Asset Class", "/v1/fixedassetclass?pagesize=1"),
    ("fixed-asset-property-tax-group", "Fixed Asset Property Tax Group", "/v1/fixedassetpropertytaxgroup?pagesize=1"),
    ("general-ledger-balance", "General Ledger Balance", "/v2/generalledgerbalance?periodid=202601&pagesize=1"),
    ("inventory", "Inventory", "/v1/inventory?pagesize=1"),
    ("inventory-adjustment", "Inventory Adjustment", "/v1/inventoryadjustment?pagesize=1"),
    ("inventory-issue", "Inventory Issue", "/v1/inventoryissue?pagesize=1"),
    ("inventory-receipt", "Inventory Receipt", "/v1/inventoryreceipt?pagesize=1"),
    ("inventory-transfer", "Inventory Transfer", "/v1/inventorytransfer?pagesize=1"),
    ("kit-assembly", "Kit Assembly", "/v1/kitassembly?pagesize=1"),
    ("kit-specifications", "Kit Specifications", "/v1/kitspecifications?pagesize=1"),
    ("landed-cost-code", "Landed Cost Code", "/v1/landedcostcode?pagesize=1"),
    ("ledger", "Ledger", "/v1/ledger?pagesize=1"),
    ("location", "Location", "/v1/location?pagesize=1"),
    ("lot-serial-class", "Lot Serial Class", "/v1/lotserialclass?pagesize=1"),
    ("number-sequence", "Number Sequence", "/v1/numbersequence?pagesize=1"),
    ("organization", "Organization", "/v1/organization?pagesize=1"),
    ("packaging-type", "Packaging Type", "/v1/packagingtype?pagesize=1"),
    ("payment-method", "Payment Method", "/v1/paymentmethod?pagesize=1"),
    ("project", "Project", "/v1/project?pagesize=1"),
    ("project-account-group", "Project Account Group", "/v1/projectaccountgroup?pagesize=1"),
    ("project-basic", "Project Basic", "/v1/projectbasic?pagesize=1"),
    ("project-budget", "Project Budget", "/v1/projectbudget?pagesize=1"),
    ("purchase-order", "Purchase Order", "/v1/purchaseorder?pagesize=1"),
    ("purchase-order-basic", "Purchase Order Basic", "/v1/purchaseorderbasic?pagesize=1"),
    ("purchase-receipt-v2", "Purchase Receipt V2", "/v2/purchasereceipt?pagesize=1"),
    ("purchase-receipt-basic", "Purchase Receipt Basic", "/v1/purchasereceiptbasic?pagesize=1"),
    ("sales-category", "Sales Category", "/v1/salescategory?pagesize=1"),
    ("sales-order-v2", "Sales Order V2", "/v2/salesorder?pagesize=1"),
    ("sales-order-basic-v2", "Sales Order Basic V2", "/v1/salesorderbasic?pagesize=1"),
    ("sales-order-type", "Sales Order Type", "/v1/salesordertype?pagesize=1"),
    ("sales-person-v2", "Sales Person V2", "/v2/salesperson?pagesize=1"),
    ("shipment", "Shipment", "/v1/shipment?pagesize=1"),
    ("stocktake-v2", "Stocktake V2", "/v2/stocktake?pagesize=1"),
    ("subaccount", "Subaccount", "/v1/subaccount?pagesize=1"),
    ("supplier-document", "Supplier Document", "/v1/supplierdocument?pagesize=1"),
    ("supplier-invoice", "Supplier Invoice", "/v1/supplierinvoice?pagesize=1"),
    ("supplier-location", "Supplier Location", "/v1/supplierlocation?pagesize=1"),
];

const EMPLOYEE_ENDPOINTS: &[EndpointSpec] = &[
    ("employees", "Employees", "/v2/employees?pageSize=1"),
    ("positions", "Positions", "/v2/employees?onlyActive=true&pageSize=1"),
    ("tax-units", "Tax Units", "/v2/taxUnits"),
];

const PAYROLL_ENDPOINTS: &[EndpointSpec] = &[
    ("paycodes", "Paycodes", "/v1/query/paycodes"),
    ("employees", "Employees", "/v1/query/employees"),
    ("wageruns", "Wage Runs", "/v1/query/wageruns"),
];

const CALENDAR_ENDPOINTS: &[EndpointSpec] = &[("categories", "Categories", "/v1/categories")];

/// (id, name, base URL env var, default base URL, endpoints)
const BUILTIN_PROVIDERS: &[(&str, &str, &str, &str, &[EndpointSpec])] = &[
    (
        "visma-erp",
        "Visma.net ERP API",
        "VISMA_ERP_BASE_URL",
        "https://integration.visma.net",
        ERP_ENDPOINTS,
    ),
    (
        "employee-api",
        "Employee API",
        "VISMA_EMPLOYEE_BASE_URL",
        "https://api.employeecore.hrm.visma.net",
        EMPLOYEE_ENDPOINTS,
    ),
    (
        "payroll-api",
        "Payroll API",
        "VISMA_PAYROLL_BASE_URL",
        "https://payrollapi.no.visma.net",
        PAYROLL_ENDPOINTS,
    ),
    (
        "calendar-api",
        "Calendar API",
        "VISMA_CALENDAR_BASE_URL",
        "https://api.calendar.hrm.visma.net",
        CALENDAR_ENDPOINTS,
    ),
];

fn builtin_providers(lookup: impl Fn(&str) -> Option<String>) -> Vec<Provider> {
    BUILTIN_PROVIDERS
        .iter()
        .map(|(id, name, env_var, default_url, endpoints)| {
            let base_url = lookup(*env_var).unwrap_or_else(|| default_url.to_string());
            Provider::new(
                *id,
                *name,
                base_url,
                endpoints
                    .iter()
                    .map(|(eid, ename, path)| ProviderEndpoint::new(*eid, *ename, *path))
                    .collect(),
            )
        })
        .collect()
}
