//! User-facing message constants.
//!
//! Error messages are returned verbatim in API error bodies, so clients match
//! on them. Success messages are used as audit-log descriptions.

// ---------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------

pub mod common {
    pub const START_INDEX_NEGATIVE: &str = "Start index cannot be negative.";
    pub const INVALID_PAGINATION: &str = "Invalid pagination: end must be greater than start";
    pub const INVALID_LOGIC_OPERATOR: &str = "Invalid logic operator. Must be 'AND' or 'OR'.";
    pub const FILTER_VALUE_REQUIRED: &str = "A filter value is required for operator: ";
    pub const INVALID_COLUMN_PREFIX: &str = "Invalid column name: ";
    pub const INVALID_OPERATOR_PREFIX: &str = "Invalid operator: ";
    pub const INVALID_FILTER_VALUE_PREFIX: &str = "Invalid filter value for column: ";
    pub const INTEGRATION_FAILED_PREFIX: &str = "The external provider rejected the request: ";
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

pub mod address {
    pub const INVALID_ID: &str = "Invalid Address Id.";
    pub const STREET_REQUIRED: &str = "Address line 1 is required.";
    pub const CITY_REQUIRED: &str = "City is required.";
    pub const STATE_REQUIRED: &str = "State is required.";
    pub const POSTAL_CODE_REQUIRED: &str = "Zip Code is required.";
    pub const COUNTRY_REQUIRED: &str = "Country is required.";
    pub const INVALID_TYPE: &str =
        "Invalid address type. Must be one of: HOME, WORK, BILLING, SHIPPING, OFFICE, WAREHOUSE.";
    pub const INVALID_POSTAL_CODE: &str = "Invalid postal code. Must be a 5 or 6 digit number.";

    pub const INSERTED: &str = "Successfully inserted address.";
    pub const UPDATED: &str = "Successfully updated address.";
    pub const TOGGLED: &str = "Successfully deleted address.";
}

pub mod client {
    pub const INVALID_ID: &str = "Invalid Client Id.";
    pub const NAME_REQUIRED: &str = "Client name is required and cannot be empty.";
    pub const DESCRIPTION_REQUIRED: &str = "Client description is required and cannot be empty.";
    pub const SUPPORT_EMAIL_REQUIRED: &str = "Client support email is required and cannot be empty.";
    pub const WEBSITE_REQUIRED: &str = "Client website is required and cannot be empty.";
    pub const SENDER_NAME_REQUIRED: &str = "SendGrid sender name is required and cannot be empty.";

    pub const UPDATED: &str = "Successfully updated client.";
}

pub mod login {
    pub const CREDENTIALS_REQUIRED: &str = "Email and password cannot be null or empty.";
    pub const INVALID_EMAIL: &str = "Invalid User Email";
    pub const INVALID_CREDENTIALS: &str = "Invalid Credentials";
    pub const EMAIL_NOT_CONFIRMED: &str = "Please Confirm Your Account first";
    pub const ACCOUNT_LOCKED: &str =
        "Your account has been locked please reset your password to login";
    pub const LOCKED_AFTER_ATTEMPTS: &str = "Due to multiple failed attempts your account has been locked please reset your password to unlock your account";
    pub const INVALID_ID: &str = "Invalid User Id";
    pub const INVALID_TOKEN: &str = "Invalid token";
    pub const RESET_LOGIN_REQUIRED: &str = "User email is required in order to reset the password.";
    pub const RESET_EMAIL_FAILED: &str = "Failed to send reset password email";

    pub const SIGNED_IN: &str = "Successfully signed in.";
    pub const EMAIL_CONFIRMED: &str = "Successfully confirmed email.";
    pub const PASSWORD_RESET: &str = "Successfully reset password.";
    pub const CONFIRMATION_SUBJECT: &str = "Confirm your account";
    pub const RESET_SUBJECT: &str = "Your password has been reset";
}

pub mod user {
    pub const INVALID_ID: &str = "Invalid User Id";
    pub const LOGIN_NAME_REQUIRED: &str = "Login name is required and cannot be empty.";
    pub const FIRST_NAME_REQUIRED: &str = "First name is required and cannot be empty.";
    pub const LAST_NAME_REQUIRED: &str = "Last name is required and cannot be empty.";
    pub const INVALID_EMAIL: &str = "Email is required and should be valid.";
    pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters long.";
    pub const EMAIL_EXISTS: &str = "The given email already exists in the system.";
    pub const UNKNOWN_EMAIL: &str = "Invalid Email";

    pub const INSERTED: &str = "Successfully inserted user.";
    pub const UPDATED: &str = "Successfully updated user.";
    pub const TOGGLED: &str = "Successfully toggled user.";
}

pub mod user_group {
    pub const INVALID_ID: &str = "Invalid Group Id";
    pub const NAME_EXISTS: &str = "Group name exists in the system.";
    pub const INVALID_MEMBER: &str = "One or more user ids is not valid.";
    pub const NAME_REQUIRED: &str = "User group name is required.";
    pub const MEMBERS_REQUIRED: &str =
        "At least one user should be selected to include in the user group.";

    pub const INSERTED: &str = "Successfully inserted group.";
    pub const UPDATED: &str = "Successfully updated group.";
    pub const TOGGLED: &str = "Successfully toggled group.";
}

pub mod todo {
    pub const INVALID_ID: &str = "Invalid todo Id.";
    pub const TASK_REQUIRED: &str = "Task is required and cannot be empty.";
    pub const TASK_TOO_LONG: &str = "Task cannot exceed 500 characters.";

    pub const INSERTED: &str = "Successfully inserted todo.";
    pub const UPDATED: &str = "Successfully updated todo.";
    pub const DELETED: &str = "Successfully deleted todo.";
    pub const TOGGLED: &str = "Successfully toggled todo.";
}

pub mod message {
    pub const INVALID_ID: &str = "Invalid message Id.";
    pub const CANCEL_FAILED: &str = "There was an error cancelling the scheduled email.";
    pub const TITLE_REQUIRED: &str = "Message title cannot be empty.";
    pub const TITLE_TOO_LONG: &str = "Message title is too long (max 500 characters).";
    pub const DESCRIPTION_REQUIRED: &str = "Message description html cannot be empty";
    pub const RECIPIENTS_REQUIRED: &str =
        "Atleast one user/usergroup needs to be present in the message.";
    pub const PUBLISH_DATE_IN_PAST: &str =
        "Cannot schedule email in the past. Publish date must be in the future.";
    pub const PUBLISH_DATE_BEYOND_WINDOW: &str = "Cannot schedule email beyond 72 hours. SendGrid only allows scheduling within a 72-hour window from now (UTC timezone).";
    pub const ALREADY_SENT: &str =
        "Cannot edit message. The scheduled email has already been sent (publish date has passed).";
    pub const PUBLISH_DATE_REQUIRES_EMAIL: &str =
        "If publish date is set, sendAsEmail must be true.";
    pub const CANNOT_DISABLE_EMAIL: &str = "Cannot disable sendAsEmail once it has been enabled.";
    pub const CANNOT_ADD_PUBLISH_DATE_AFTER_SENT: &str =
        "Cannot add publish date to a message that was already sent as email without scheduling.";
    pub const CANNOT_MODIFY_SCHEDULED_DATE: &str =
        "Cannot modify publish date for a scheduled email.";
    pub const CANNOT_DISABLE_SCHEDULED_EMAIL: &str =
        "Cannot disable sendAsEmail for a scheduled email.";
    pub const INVALID_RECIPIENT: &str = "Invalid user ID.";

    pub const INSERTED: &str = "Successfully inserted message.";
    pub const UPDATED: &str = "Successfully updated message.";
    pub const TOGGLED: &str = "Successfully toggled message.";
    pub const MARKED_READ: &str = "Successfully marked message as read.";
}

pub mod package {
    pub const INVALID_ID: &str = "Invalid Package Id";
    pub const NAME_REQUIRED: &str = "Package name is required and cannot be empty.";
    pub const INVALID_LENGTH: &str = "Package length is required and must be greater than 0.";
    pub const INVALID_BREADTH: &str = "Package breadth is required and must be greater than 0.";
    pub const INVALID_HEIGHT: &str = "Package height is required and must be greater than 0.";
    pub const INVALID_MAX_WEIGHT: &str =
        "Package max weight is required and must be greater than or equal to 0.";
    pub const INVALID_STANDARD_CAPACITY: &str =
        "Package standard capacity is required and must be greater than 0.";
    pub const INVALID_PRICE_PER_UNIT: &str =
        "Package price per unit is required and must be greater than or equal to 0.";
    pub const TYPE_REQUIRED: &str = "Package type is required and cannot be empty.";
    pub const INVALID_QUANTITY: &str = "Quantity is required and should be greater than 0";
    pub const DUPLICATE_DIMENSIONS: &str = "Package with the same dimensions exists in the system, please update the quantity of the same package.";
    pub const BULK_EMPTY: &str = "Package list cannot be null or empty.";

    pub const INSERTED: &str = "Successfully inserted package in the system.";
    pub const UPDATED: &str = "Successfully updated package in the system.";
    pub const TOGGLED: &str = "Successfully toggled package status.";
    pub const BULK_INSERTED: &str = "Bulk package import finished.";
}

pub mod product {
    pub const INVALID_ID: &str = "Invalid product Id.";
    pub const TITLE_REQUIRED: &str = "Product title is required and cannot be empty.";
    pub const DESCRIPTION_REQUIRED: &str = "Product description is required and cannot be empty.";
    pub const BRAND_REQUIRED: &str = "Product brand is required and cannot be empty.";
    pub const COLOR_LABEL_REQUIRED: &str = "Product color label is required and cannot be empty.";
    pub const CONDITION_REQUIRED: &str = "Product condition is required and cannot be empty.";
    pub const INVALID_CONDITION_PREFIX: &str = "Product condition must be one of: ";
    pub const COUNTRY_REQUIRED: &str =
        "Product country of manufacture is required and cannot be empty.";
    pub const INVALID_PRICE: &str =
        "Product price is required and must be greater than or equal to 0.";
    pub const CATEGORY_REQUIRED: &str = "Product category ID is required.";
    pub const INVALID_WEIGHT: &str = "Product weight must be greater than or equal to 0.";
    pub const INVALID_DIMENSIONS: &str =
        "Product length, breadth and height must be greater than 0 when provided.";
    pub const PICKUP_LOCATION_REQUIRED: &str =
        "Product pickup location ID is required and cannot be 0.";

    pub const INSERTED: &str = "Successfully inserted product.";
    pub const UPDATED: &str = "Successfully updated product.";
    pub const TOGGLED: &str = "Successfully toggled product.";
    pub const RETURN_TOGGLED: &str = "Successfully toggled product return.";
}

pub mod pickup_location {
    pub const INVALID_ID: &str = "Invalid pickup location Id.";
    pub const NICKNAME_REQUIRED: &str = "Address nickname is required and cannot be empty.";
    pub const NICKNAME_TOO_LONG: &str =
        "Location name must be 36 characters or less (Shiprocket limit).";
    pub const REGISTRATION_FAILED_PREFIX: &str =
        "Failed to register pickup location with the shipping provider: ";
    pub const BULK_EMPTY: &str = "Pickup location list cannot be null or empty.";

    pub const INSERTED: &str = "Successfully inserted pickup location.";
    pub const UPDATED: &str = "Successfully updated pickup location.";
    pub const TOGGLED: &str = "Successfully toggled pickup location.";
    pub const BULK_INSERTED: &str = "Bulk pickup location import finished.";
}

pub mod promo {
    pub const INVALID_ID: &str = "Invalid promo Id.";
    pub const INVALID_CODE: &str = "Invalid promo code.";
    pub const OVERLAPPING_CODE: &str =
        "A promo with this code already exists during the specified time period.";
    pub const DESCRIPTION_REQUIRED: &str = "Description is required and cannot be empty.";
    pub const DESCRIPTION_TOO_LONG: &str = "Description cannot exceed 1000 characters.";
    pub const INVALID_DISCOUNT: &str = "Promo discount value is required and should be greater than 0.";
    pub const INVALID_PERCENTAGE: &str = "Percentage discount cannot exceed 100%.";
    pub const CODE_REQUIRED: &str = "Promo code is required.";
    pub const CODE_FORMAT: &str =
        "Promo code must be between 3 and 50 characters and contain only letters and digits.";
    pub const START_DATE_REQUIRED: &str = "Start date is required.";
    pub const EXPIRY_BEFORE_START: &str = "Expiry date must be after or equal to start date.";
    pub const BULK_EMPTY: &str = "Promo list cannot be null or empty.";

    pub const INSERTED: &str = "Successfully inserted promo code.";
    pub const TOGGLED: &str = "Successfully toggled promo code.";
    pub const BULK_INSERTED: &str = "Bulk promo import finished.";
}

pub mod lead {
    pub const INVALID_ID: &str = "Invalid lead id.";
    pub const EMAIL_REQUIRED: &str = "Lead email is required.";
    pub const FIRST_NAME_REQUIRED: &str = "Lead first name is required.";
    pub const LAST_NAME_REQUIRED: &str = "Lead last name is required.";
    pub const PHONE_REQUIRED: &str = "Lead phone number is required.";
    pub const INVALID_AGENT: &str = "Assigned Agent user id should be present in the database.";
    pub const INVALID_STATUS_PREFIX: &str =
        "Invalid lead status, the lead status should be one of the following: ";
    pub const INVALID_EMAIL: &str = "Invalid email format.";
    pub const INVALID_PHONE: &str = "Invalid phone number format.";
    pub const ADDRESS_REQUIRED: &str =
        "Address is required. Either provide an address object or an existing addressId.";
    pub const INVALID_COMPANY_SIZE: &str = "Company size must be greater than 0 if provided.";
    pub const NOT_FOUND: &str = "Lead not found for the given ID.";
    pub const BULK_EMPTY: &str = "Lead list cannot be null or empty.";

    pub const INSERTED: &str = "Successfully inserted lead.";
    pub const UPDATED: &str = "Successfully updated lead.";
    pub const TOGGLED: &str = "Successfully toggled lead.";
    pub const BULK_INSERTED: &str = "Bulk lead import finished.";
}

pub mod purchase_order {
    pub const INVALID_ID: &str = "Invalid purchase order Id.";
    pub const VENDOR_NUMBER_REQUIRED: &str = "Vendor number is required and cannot be empty.";
    pub const STATUS_REQUIRED: &str = "Order status is required and cannot be empty.";
    pub const INVALID_STATUS: &str = "Invalid purchase order status.";
    pub const INVALID_PRIORITY: &str =
        "Priority is required and must be one of: LOW, MEDIUM, HIGH, URGENT.";
    pub const ASSIGNED_LEAD_REQUIRED: &str = "Assigned lead id should be present and cannot be 0";
    pub const PRODUCTS_REQUIRED: &str = "At least one product must be specified in products list";
    pub const INVALID_PRODUCT: &str = "Product id should be valid and present in the database and quantity for each product should be greater than 0";
    pub const NEGATIVE_PRICE_PREFIX: &str =
        "pricePerUnit must be greater than or equal to 0 for productId ";
    pub const DUPLICATE_PRODUCT_PREFIX: &str = "Duplicate productId in products list: ";
    pub const MAX_ATTACHMENTS: &str = "Maximum 30 attachments allowed per purchase order.";
    pub const INVALID_ATTACHMENT: &str = "Each attachment must be a valid URL.";
    pub const INVALID_AMOUNT: &str = "Payment amounts must be greater than or equal to 0.";
    pub const ALREADY_APPROVED: &str = "Purchase order is already approved.";
    pub const ALREADY_REJECTED: &str = "Purchase order is already rejected.";

    pub const INSERTED: &str = "Successfully inserted purchase order.";
    pub const UPDATED: &str = "Successfully updated purchase order.";
    pub const TOGGLED: &str = "Successfully toggled purchase order.";
    pub const APPROVED: &str = "Successfully approved purchase order.";
    pub const REJECTED: &str = "Successfully rejected purchase order.";
}

pub mod payment {
    pub const NOT_FOUND: &str = "Payment not found.";
    pub const ONLY_PENDING_APPROVAL: &str = "Only orders with PENDING_APPROVAL status can be paid.";
    pub const FOLLOW_UP_STATUS: &str = "Follow-up payments can only be made for APPROVED or APPROVED_WITH_PARTIAL_PAYMENT orders.";
    pub const DATE_REQUIRED: &str = "Payment date is required.";
    pub const AMOUNT_REQUIRED: &str = "Valid payment amount is required.";
    pub const EXCEEDS_PENDING_PREFIX: &str = "Payment amount exceeds the pending amount. Pending: ";

    pub const RECORDED: &str = "Cash payment recorded.";
    pub const FOLLOW_UP_RECORDED: &str = "Follow-up cash payment recorded.";
}

pub mod shipment {
    pub const INVALID_ID: &str = "Invalid shipment Id.";
    pub const NOT_FOUND_PREFIX: &str = "Shipment not found with ID: ";
    pub const ORDER_REQUIRED: &str = "Purchase order ID is required and must be greater than 0.";
    pub const PICKUP_LOCATION_REQUIRED: &str =
        "Pickup location ID is required and must be greater than 0.";
    pub const INVALID_WEIGHT: &str = "Total weight must be greater than or equal to 0.";
    pub const INVALID_QUANTITY: &str = "Total quantity is required and must be greater than 0.";
    pub const INVALID_PACKAGING_COST: &str = "packagingCost must be greater than or equal to 0.";
    pub const INVALID_SHIPPING_COST: &str = "shippingCost must be greater than or equal to 0.";
    pub const ORDER_NOT_APPROVED: &str = "Shipments can only be created for approved purchase orders.";
    pub const ALREADY_CANCELLED: &str = "Shipment is already cancelled.";
    pub const NO_PROVIDER_ORDER: &str = "Shipment does not have a provider order ID. Cannot cancel.";
    pub const PROVIDER_FAILED_PREFIX: &str = "Shipping provider rejected the shipment: ";

    pub const INSERTED: &str = "Successfully created shipment.";
    pub const CANCELLED: &str = "Successfully cancelled shipment.";
}

pub mod product_review {
    pub const NOT_FOUND: &str = "Product review not found.";
    pub const INVALID_RATINGS: &str =
        "Product Review ratings should be present and should be between 0 and 5";
    pub const REVIEW_REQUIRED: &str = "Product Review text is required.";
    pub const INVALID_USER: &str = "Product Review user id is required and should be valid.";
    pub const INVALID_PRODUCT: &str = "Product Review product id is required and should be valid.";
    pub const INVALID_PARENT: &str = "Parent review must belong to the same product.";

    pub const INSERTED: &str = "Successfully inserted product review.";
    pub const TOGGLED: &str = "Successfully toggled product review.";
    pub const SCORE_UPDATED: &str = "Successfully updated the review Score.";
}

pub mod qa {
    pub const TEST_TARGET_REQUIRED: &str = "Test target is required when running specific tests.";
    pub const SERVICE_OR_TARGET_REQUIRED: &str =
        "Must specify serviceName or test target when running tests by method name.";
    pub const SCOPE_REQUIRED: &str = "Must specify runAll, testNames, or methodName.";
    pub const EXECUTION_NOT_FOUND_PREFIX: &str = "Test execution not found: ";
    pub const EXIT_CODE_PREFIX: &str = "Tests failed. Exit code: ";
    pub const SERVICE_NAME_REQUIRED: &str = "Service name is required";
    pub const RESULTS_REQUIRED: &str = "At least one test result is required";
}
