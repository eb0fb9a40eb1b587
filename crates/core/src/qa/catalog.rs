//! Catalog of the services the QA dashboard reports on.
//!
//! Each entry names a service, the route prefix its operations are mounted
//! under and the test suite its recorded results are filed against.
//! Coverage is worked out from recorded results: an operation is covered
//! once any result names it.

use serde::Serialize;

/// Suffix every catalogued service name carries.
pub const SERVICE_SUFFIX: &str = "Service";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceEntry {
    pub name: &'static str,
    pub base_path: &'static str,
    pub test_suite: &'static str,
    pub methods: &'static [&'static str],
}

impl ServiceEntry {
    /// Route of one of this service's operations, as listed on the dashboard.
    pub fn api_route(&self, method: &str) -> String {
        format!("{}/{method}", self.base_path)
    }
}

const fn entry(
    name: &'static str,
    base_path: &'static str,
    test_suite: &'static str,
    methods: &'static [&'static str],
) -> ServiceEntry {
    ServiceEntry {
        name,
        base_path,
        test_suite,
        methods,
    }
}

pub const SERVICES: &[ServiceEntry] = &[
    entry(
        "AddressService",
        "/api/v1/addresses",
        "address_tests",
        &["create", "update", "toggle_deleted", "get", "list", "list_for_user"],
    ),
    entry("ClientService", "/api/v1/clients", "client_tests", &["get_current", "update_current"]),
    entry(
        "LeadService",
        "/api/v1/leads",
        "lead_tests",
        &["create", "bulk_create", "update", "toggle_deleted", "get", "get_by_email", "list"],
    ),
    entry("LoginService", "/api/v1/auth", "login_tests", &["login", "confirm_email", "reset_password"]),
    entry(
        "MessageService",
        "/api/v1/messages",
        "message_tests",
        &["create", "update", "toggle_deleted", "mark_read", "list_for_user", "get", "list"],
    ),
    entry(
        "PackageService",
        "/api/v1/packages",
        "package_tests",
        &["create", "bulk_create", "update", "toggle_deleted", "get", "list_all", "list"],
    ),
    entry(
        "PaymentService",
        "/api/v1/payments",
        "payment_tests",
        &[
            "record_cash_payment",
            "record_follow_up_payment",
            "list_for_purchase_order",
            "get",
            "is_purchase_order_paid",
        ],
    ),
    entry(
        "PickupLocationService",
        "/api/v1/pickup-locations",
        "pickup_location_tests",
        &["create", "bulk_create", "update", "toggle_deleted", "get", "list"],
    ),
    entry(
        "ProductService",
        "/api/v1/products",
        "product_tests",
        &["create", "update", "toggle_deleted", "toggle_return", "get", "list"],
    ),
    entry(
        "ProductReviewService",
        "/api/v1/product-reviews",
        "product_review_tests",
        &["create", "list_for_product", "toggle_deleted", "set_score"],
    ),
    entry(
        "PromoService",
        "/api/v1/promos",
        "promo_tests",
        &["create", "bulk_create", "toggle_deleted", "get", "get_by_code", "discount", "list"],
    ),
    entry(
        "PurchaseOrderService",
        "/api/v1/purchase-orders",
        "purchase_order_tests",
        &["create", "update", "approve", "reject", "toggle_deleted", "get", "list"],
    ),
    entry(
        "ShipmentService",
        "/api/v1/shipments",
        "shipment_tests",
        &["create", "cancel", "get", "list"],
    ),
    entry(
        "TodoService",
        "/api/v1/todos",
        "todo_tests",
        &["create", "update", "toggle_deleted", "toggle_done", "delete", "get", "list_mine"],
    ),
    entry(
        "UserService",
        "/api/v1/users",
        "user_tests",
        &["create", "update", "toggle_deleted", "get", "get_by_email", "list"],
    ),
    entry(
        "UserGroupService",
        "/api/v1/user-groups",
        "user_group_tests",
        &["create", "update", "toggle_deleted", "get", "list"],
    ),
    entry("UserLogService", "/api/v1/user-logs", "user_log_tests", &["list"]),
];

/// Names of every catalogued service, in catalog order.
pub fn service_names() -> Vec<&'static str> {
    SERVICES.iter().map(|s| s.name).collect()
}

/// `"Lead"` and `"LeadService"` both name the lead service.
pub fn normalize_service_name(raw: &str) -> String {
    let name = raw.trim();
    if name.ends_with(SERVICE_SUFFIX) {
        name.to_string()
    } else {
        format!("{name}{SERVICE_SUFFIX}")
    }
}

pub fn find_service(name: &str) -> Option<&'static ServiceEntry> {
    let name = normalize_service_name(name);
    SERVICES.iter().find(|s| s.name == name)
}

/// Share of `covered` in `total` as a percentage rounded to two decimals.
/// Zero when there is nothing to cover.
pub fn coverage_percentage(covered: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = covered as f64 / total as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}
