//! GraphQL documents sent to the Vendure shop-api and admin-api.
//!
//! Every operation is named; the transport trims surrounding whitespace.

// ── Checkout ─────────────────────────────────────────────────────────────────

pub const ELIGIBLE_SHIPPING_METHODS: &str = r#"
    query EligibleShippingMethods {
      eligibleShippingMethods {
        id
        name
        price
      }
    }
"#;

pub const SET_SHIPPING_METHOD: &str = r#"
    mutation SetShipping($shippingMethodIds: [ID!]!) {
      setOrderShippingMethod(shippingMethodId: $shippingMethodIds) {
        ... on Order {
          id
          createdAt
          updatedAt
          type
          orderPlacedAt
          code
          state
          active
          totalQuantity
          subTotal
          subTotalWithTax
          currencyCode
          shipping
          shippingWithTax
          total
          totalWithTax
        }
        ... on ErrorResult {
          errorCode
          message
        }
      }
    }
"#;

pub const SET_DELIVERY_TYPE: &str = r#"
    mutation SetOrderCustomFields($customFields: UpdateOrderCustomFieldsInput!) {
      setOrderCustomFields(input: { customFields: $customFields }) {
        ... on Order {
          id
          code
          customFields {
            deliveryType
          }
        }
        ... on ErrorResult {
          errorCode
          message
        }
      }
    }
"#;

pub const SET_BILLING_ADDRESS: &str = r#"
    mutation SetBilling($input: CreateAddressInput!) {
      setOrderBillingAddress(input: $input) {
        ... on Order { id }
        ... on ErrorResult { errorCode message }
      }
    }
"#;

pub const SET_SHIPPING_ADDRESS: &str = r#"
    mutation SetShippingAddress($input: CreateAddressInput!) {
      setOrderShippingAddress(input: $input) {
        ... on Order { id }
        ... on ErrorResult { errorCode message }
      }
    }
"#;

pub const TRANSITION_TO_ARRANGING_PAYMENT: &str = r#"
    mutation TransitionToArrangingPayment {
      transitionOrderToState(state: "ArrangingPayment") {
        ... on Order { id state }
        ... on ErrorResult { errorCode message }
      }
    }
"#;

pub const ADD_PAYMENT: &str = r#"
    mutation AddPayment($method: String!, $metadata: JSON!) {
      addPaymentToOrder(input: { method: $method, metadata: $metadata }) {
        ... on Order {
          id
          code
          state
          totalWithTax
          customer { emailAddress }
        }
        ... on ErrorResult { errorCode message }
      }
    }
"#;

// ── Authentication ───────────────────────────────────────────────────────────

pub const CUSTOMER_LOGIN: &str = r#"
    mutation Login($email: String!, $password: String!) {
      login(username: $email, password: $password) {
        ... on CurrentUser {
          id
          identifier
          channels {
            id
            token
          }
        }
        ... on InvalidCredentialsError {
          errorCode
          message
          authenticationError
        }
        ... on NotVerifiedError {
          errorCode
          message
        }
        ... on ErrorResult {
          errorCode
          message
        }
      }
    }
"#;

pub const ADMIN_LOGIN: &str = r#"
    mutation AdminLogin($username: String!, $password: String!) {
      login(username: $username, password: $password, rememberMe: true) {
        ... on CurrentUser {
          id
          identifier
          channels {
            id
            token
            code
            permissions
          }
        }
        ... on ErrorResult {
          errorCode
          message
        }
      }
    }
"#;

pub const REGISTER_CUSTOMER: &str = r#"
    mutation RegisterCustomerAccount($input: RegisterCustomerInput!) {
      registerCustomerAccount(input: $input) {
        ... on Success {
          success
        }
        ... on MissingPasswordError {
          errorCode
          message
        }
        ... on PasswordValidationError {
          errorCode
          message
        }
        ... on NativeAuthStrategyError {
          errorCode
          message
        }
      }
    }
"#;

// ── Catalog ──────────────────────────────────────────────────────────────────

pub const PRODUCTS: &str = r#"
    query Products {
      products {
        items {
          id
          slug
          name
          description
          variants {
            id
            sku
            price
          }
        }
      }
    }
"#;

pub const COLLECTIONS: &str = r#"
    query Collections {
      collections {
        items {
          id
          name
          slug
          description
          parent {
            id
            name
          }
        }
      }
    }
"#;

// ── Customer ─────────────────────────────────────────────────────────────────

pub const ACTIVE_CUSTOMER: &str = r#"
    query ActiveCustomer {
      activeCustomer {
        id
        firstName
        lastName
        emailAddress
        phoneNumber
        addresses {
          id
          streetLine1
          city
          postalCode
          country {
            code
            name
          }
        }
        orders {
          items {
            id
            code
            total
            state
          }
        }
      }
    }
"#;

pub const CUSTOMER_ORDERS: &str = r#"
    query CustomerOrders($options: OrderListOptions) {
      activeCustomer {
        orders(options: $options) {
          items {
            id
            orderPlacedAt
            totalWithTax
            currencyCode
            state
            lines {
              id
              linePriceWithTax
              quantity
              productVariant {
                id
                name
                priceWithTax
                featuredAsset {
                  preview
                }
              }
            }
          }
        }
      }
    }
"#;

// ── Cart ─────────────────────────────────────────────────────────────────────

pub const ACTIVE_ORDER: &str = r#"
    query ActiveOrder {
      activeOrder {
        id
        lines {
          id
          linePriceWithTax
          quantity
          productVariant {
            id
            name
            priceWithTax
            featuredAsset {
              preview
            }
            currencyCode
          }
        }
        totalWithTax
        totalQuantity
        currencyCode
      }
    }
"#;

pub const ORDER_DETAILS: &str = r#"
    query OrderDetails($id: ID!) {
      order(id: $id) {
        id
        orderPlacedAt
        subTotalWithTax
        shippingWithTax
        totalWithTax
        currencyCode
        state
        lines {
          id
          linePriceWithTax
          quantity
          productVariant {
            id
            name
            priceWithTax
            currencyCode
            featuredAsset {
              preview
            }
          }
        }
        shippingAddress {
          fullName
          phoneNumber
          streetLine1
          streetLine2
          city
          province
          postalCode
          countryCode
          country
        }
        billingAddress {
          fullName
          phoneNumber
          streetLine1
          streetLine2
          city
          province
          postalCode
          countryCode
          country
        }
      }
    }
"#;

pub const ADD_ITEM_TO_ORDER: &str = r#"
    mutation AddItemToOrder($productVariantId: ID!, $quantity: Int!) {
      addItemToOrder(productVariantId: $productVariantId, quantity: $quantity) {
        ... on Order {
          id
          lines {
            id
            linePriceWithTax
            quantity
            productVariant {
              id
              name
              priceWithTax
              currencyCode
              assets { preview }
              product { assets { preview } }
            }
          }
          totalWithTax
          totalQuantity
          currencyCode
        }
        ... on InsufficientStockError {
          errorCode
          message
          quantityAvailable
        }
        ... on OrderLimitError {
          errorCode
          message
          maxItems
        }
        ... on ErrorResult {
          errorCode
          message
        }
      }
    }
"#;

pub const ADJUST_ORDER_LINE: &str = r#"
    mutation AdjustOrderLine($orderLineId: ID!, $quantity: Int!) {
      adjustOrderLine(orderLineId: $orderLineId, quantity: $quantity) {
        ... on Order {
          id
          lines {
            id
            linePriceWithTax
            quantity
            productVariant {
              id
              name
              priceWithTax
              currencyCode
              assets { preview }
              product { assets { preview } }
            }
          }
          totalWithTax
          totalQuantity
          currencyCode
        }
        ... on InsufficientStockError {
          errorCode
          message
          quantityAvailable
        }
        ... on OrderLimitError {
          errorCode
          message
          maxItems
        }
        ... on ErrorResult {
          errorCode
          message
        }
      }
    }
"#;

pub const REMOVE_ORDER_LINE: &str = r#"
    mutation RemoveOrderLine($orderLineId: ID!) {
      removeOrderLine(orderLineId: $orderLineId) {
        ... on Order {
          id
          lines {
            id
            linePriceWithTax
            quantity
            productVariant {
              id
              name
              priceWithTax
              currencyCode
              assets { preview }
              product { assets { preview } }
            }
          }
          totalWithTax
          totalQuantity
          currencyCode
        }
        ... on ErrorResult {
          errorCode
          message
        }
      }
    }
"#;

/// Operation name of a document, e.g. `SetBilling`.
pub fn operation_name(document: &str) -> Option<&str> {
    let mut tokens = document.split_whitespace();
    match tokens.next()? {
        "query" | "mutation" => {}
        _ => return None,
    }
    let name = tokens.next()?;
    let end = name.find(['(', '{']).unwrap_or(name.len());
    Some(&name[..end]).filter(|n| !n.is_empty())
}
