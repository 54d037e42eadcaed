//! Integration tests for the catalog, cart and account stores.
//!
//! Verifies:
//! - Storage-level unique keys surface as `Uniqueness` errors
//! - Link writes are validated and rejected atomically
//! - Dense ordering through the explicit "assign next" operations
//! - Cascades and protected deletes keep the graph consistent
//! - Concurrent conflicting link writes admit exactly one winner

use std::sync::Arc;

use storefront_accounts::{PasswordPolicy, RegisterUser, UserStore};
use storefront_cart::{CartOwner, CartStatus, CartStore};
use storefront_catalog::{
    AddProductImage, Attribute, AttributeGroup, AttributeValue, CatalogError, CatalogStore,
    Category, CreateAttribute, CreateAttributeValue, CreateCategory, CreateProduct, CreateVariant,
    LinkViolation, MAX_ATTRIBUTE_TEXT_LEN, Product, ProductQuery, ProductVariant, Visibility,
};
use storefront_core::{DomainError, Money};

use crate::{
    InMemoryCartStore, InMemoryCatalogStore, InMemoryUserStore, PostgresCatalogStore, lifecycle,
    price_cart,
};

fn category(store: &InMemoryCatalogStore, name: &str) -> Category {
    store.create_category(CreateCategory::named(name)).unwrap()
}

fn attribute(store: &InMemoryCatalogStore, name: &str, group: AttributeGroup) -> Attribute {
    store.create_attribute(CreateAttribute::new(name, group)).unwrap()
}

/// Append a value at the next free position.
fn value(store: &InMemoryCatalogStore, attribute: &Attribute, text: &str) -> AttributeValue {
    let sort_order = store.next_attribute_value_sort_order(attribute.id).unwrap();
    store
        .create_attribute_value(CreateAttributeValue {
            attribute_id: attribute.id,
            value: text.to_string(),
            sort_order,
        })
        .unwrap()
}

fn product(store: &InMemoryCatalogStore, category: &Category, name: &str, cents: u64) -> Product {
    store
        .create_product(CreateProduct::new(category.id, name, Money::from_cents(cents)))
        .unwrap()
}

fn variant(store: &InMemoryCatalogStore, product: &Product, sku: &str) -> ProductVariant {
    let sort_order = store.next_variant_sort_order(product.id).unwrap();
    store
        .create_variant(CreateVariant::new(product.id, sku, sort_order))
        .unwrap()
}

fn expect_violation(err: CatalogError) -> LinkViolation {
    match err {
        CatalogError::InvalidLink(mut violations) => {
            assert_eq!(violations.len(), 1, "unexpected violations: {violations:?}");
            violations.remove(0)
        }
        other => panic!("expected InvalidLink, got {other:?}"),
    }
}

fn is_conflict<T>(result: Result<T, CatalogError>) -> bool {
    matches!(result, Err(CatalogError::Domain(DomainError::Conflict(_))))
}

fn is_not_found<T>(result: Result<T, CatalogError>) -> bool {
    matches!(result, Err(CatalogError::Domain(DomainError::NotFound(_))))
}

/// Clothing / T-Shirt with Color {Red, Blue} and Size {Medium} declared.
struct Wardrobe {
    store: InMemoryCatalogStore,
    clothing: Category,
    shirt: Product,
    color: Attribute,
    size: Attribute,
    red: AttributeValue,
    blue: AttributeValue,
    medium: AttributeValue,
}

fn wardrobe() -> Wardrobe {
    let store = InMemoryCatalogStore::new();
    let clothing = category(&store, "Clothing");
    let color = attribute(&store, "Color", AttributeGroup::Color);
    let size = attribute(&store, "Size", AttributeGroup::Size);
    let red = value(&store, &color, "Red");
    let blue = value(&store, &color, "Blue");
    let medium = value(&store, &size, "Medium");
    let shirt = product(&store, &clothing, "T-Shirt", 1500);
    store.declare_attribute(shirt.id, color.id).unwrap();
    store.declare_attribute(shirt.id, size.id).unwrap();
    Wardrobe {
        store,
        clothing,
        shirt,
        color,
        size,
        red,
        blue,
        medium,
    }
}

#[test]
fn attribute_names_are_unique_ignoring_case() {
    let store = InMemoryCatalogStore::new();
    attribute(&store, "Color", AttributeGroup::Color);
    let err = store
        .create_attribute(CreateAttribute::new("COLOR", AttributeGroup::Other))
        .unwrap_err();
    match err {
        CatalogError::Domain(DomainError::Uniqueness { constraint, .. }) => {
            assert_eq!(constraint, "attribute.name")
        }
        other => panic!("expected Uniqueness, got {other:?}"),
    }
}

#[test]
fn attribute_text_longer_than_column_is_rejected() {
    let store = InMemoryCatalogStore::new();
    let long = "x".repeat(MAX_ATTRIBUTE_TEXT_LEN + 1);
    let err = store
        .create_attribute(CreateAttribute::new(long.clone(), AttributeGroup::Other))
        .unwrap_err();
    assert!(matches!(err, CatalogError::Domain(DomainError::Validation(_))));

    let finish = attribute(&store, "Finish", AttributeGroup::Other);
    let err = store
        .create_attribute_value(CreateAttributeValue {
            attribute_id: finish.id,
            value: long,
            sort_order: 0,
        })
        .unwrap_err();
    assert!(matches!(err, CatalogError::Domain(DomainError::Validation(_))));
    assert!(store.attribute_values(finish.id).unwrap().is_empty());

    let at_limit = "y".repeat(MAX_ATTRIBUTE_TEXT_LEN);
    assert_eq!(value(&store, &finish, &at_limit).value, at_limit);
}

#[test]
fn attribute_values_are_unique_per_attribute_ignoring_case() {
    let w = wardrobe();
    let err = w
        .store
        .create_attribute_value(CreateAttributeValue {
            attribute_id: w.color.id,
            value: "rED".to_string(),
            sort_order: 9,
        })
        .unwrap_err();
    assert!(err.is_uniqueness());

    // Same text under another attribute is fine.
    let finish = attribute(&w.store, "Finish", AttributeGroup::Other);
    value(&w.store, &finish, "Red");
}

#[test]
fn product_names_are_unique_per_category_ignoring_case() {
    let w = wardrobe();
    let err = w
        .store
        .create_product(CreateProduct::new(w.clothing.id, "t-shirt", Money::from_cents(1)))
        .unwrap_err();
    assert!(err.is_uniqueness());

    // Same name in another category, with derived slugs on both sides.
    let sale = category(&w.store, "Sale");
    let other = product(&w.store, &sale, "T-Shirt", 1000);
    assert_eq!(w.shirt.slug.as_str(), "clothing-t-shirt");
    assert_eq!(other.slug.as_str(), "sale-t-shirt");
}

#[test]
fn category_names_and_skus_are_unique() {
    let w = wardrobe();
    let err = w
        .store
        .create_category(CreateCategory::named("CLOTHING"))
        .unwrap_err();
    assert!(err.is_uniqueness());

    variant(&w.store, &w.shirt, "TS-RED-M");
    let err = w
        .store
        .create_variant(CreateVariant::new(w.shirt.id, "TS-RED-M", 5))
        .unwrap_err();
    assert!(err.is_uniqueness());
}

#[test]
fn declaring_attribute_twice_is_rejected() {
    let w = wardrobe();
    match w.store.declare_attribute(w.shirt.id, w.color.id).unwrap_err() {
        CatalogError::Domain(DomainError::Uniqueness { constraint, .. }) => {
            assert_eq!(constraint, "product_attribute.pair")
        }
        other => panic!("expected Uniqueness, got {other:?}"),
    }
    assert_eq!(w.store.product_attributes(w.shirt.id).unwrap().len(), 2);
}

#[test]
fn linking_undeclared_attribute_is_rejected() {
    let w = wardrobe();
    let material = attribute(&w.store, "Material", AttributeGroup::Material);
    let cotton = value(&w.store, &material, "Cotton");
    let v = variant(&w.store, &w.shirt, "TS-1");

    let err = w.store.link_attribute_value(v.id, cotton.id).unwrap_err();
    assert_eq!(
        expect_violation(err),
        LinkViolation::AttributeNotApplicable {
            attribute: "Material".to_string(),
            product: "T-Shirt".to_string(),
        }
    );
    assert!(w.store.variant_links(v.id).unwrap().is_empty());
}

#[test]
fn second_value_of_same_attribute_is_rejected() {
    let w = wardrobe();
    let v = variant(&w.store, &w.shirt, "TS-1");
    w.store.link_attribute_value(v.id, w.red.id).unwrap();

    let err = w.store.link_attribute_value(v.id, w.blue.id).unwrap_err();
    assert_eq!(
        expect_violation(err),
        LinkViolation::DuplicateAttributeAssignment {
            attribute: "Color".to_string()
        }
    );
    assert_eq!(w.store.variant_links(v.id).unwrap().len(), 1);
}

#[test]
fn relinking_to_another_value_of_same_attribute_is_allowed() {
    let w = wardrobe();
    let v = variant(&w.store, &w.shirt, "TS-1");
    let link = w.store.link_attribute_value(v.id, w.red.id).unwrap();

    let moved = w.store.relink_attribute_value(link.id, w.blue.id).unwrap();
    assert_eq!(moved.id, link.id);
    assert_eq!(moved.attribute_value_id, w.blue.id);
    assert_eq!(w.store.variant_links(v.id).unwrap(), vec![moved]);
}

#[test]
fn relinking_into_sibling_combination_is_rejected() {
    let w = wardrobe();
    let v1 = variant(&w.store, &w.shirt, "TS-RED");
    w.store.link_attribute_value(v1.id, w.red.id).unwrap();
    let v2 = variant(&w.store, &w.shirt, "TS-BLUE");
    let blue = w.store.link_attribute_value(v2.id, w.blue.id).unwrap();

    let err = w.store.relink_attribute_value(blue.id, w.red.id).unwrap_err();
    assert_eq!(
        expect_violation(err),
        LinkViolation::DuplicateVariantCombination {
            product: "T-Shirt".to_string()
        }
    );
    assert_eq!(w.store.variant_links(v2.id).unwrap(), vec![blue]);

    // The rejected write left the combination index alone.
    let v3 = variant(&w.store, &w.shirt, "TS-BLUE-2");
    let err = w.store.link_attribute_value(v3.id, w.blue.id).unwrap_err();
    assert!(matches!(expect_violation(err), LinkViolation::DuplicateVariantCombination { .. }));
}

#[test]
fn relinking_to_current_value_is_a_no_op() {
    let w = wardrobe();
    let v1 = variant(&w.store, &w.shirt, "TS-RED-M");
    let red = w.store.link_attribute_value(v1.id, w.red.id).unwrap();
    w.store.link_attribute_value(v1.id, w.medium.id).unwrap();
    let v2 = variant(&w.store, &w.shirt, "TS-BLUE-M");
    w.store.link_attribute_value(v2.id, w.blue.id).unwrap();
    w.store.link_attribute_value(v2.id, w.medium.id).unwrap();

    let same = w.store.relink_attribute_value(red.id, w.red.id).unwrap();
    assert_eq!(same, red);
    assert_eq!(w.store.variant_links(v1.id).unwrap().len(), 2);
}

#[test]
fn duplicate_combination_scenario() {
    let w = wardrobe();

    let v1 = variant(&w.store, &w.shirt, "TS-RED-M");
    w.store.link_attribute_value(v1.id, w.red.id).unwrap();
    w.store.link_attribute_value(v1.id, w.medium.id).unwrap();

    let v2 = variant(&w.store, &w.shirt, "TS-RED-M-2");
    w.store.link_attribute_value(v2.id, w.red.id).unwrap();
    let err = w.store.link_attribute_value(v2.id, w.medium.id).unwrap_err();
    assert_eq!(
        expect_violation(err),
        LinkViolation::DuplicateVariantCombination {
            product: "T-Shirt".to_string()
        }
    );
    assert_eq!(w.store.variant_links(v2.id).unwrap().len(), 1);

    let v3 = variant(&w.store, &w.shirt, "TS-BLUE-M");
    w.store.link_attribute_value(v3.id, w.blue.id).unwrap();
    w.store.link_attribute_value(v3.id, w.medium.id).unwrap();
}

#[test]
fn identical_combinations_on_different_products_are_allowed() {
    let w = wardrobe();
    let hoodie = product(&w.store, &w.clothing, "Hoodie", 4000);
    w.store.declare_attribute(hoodie.id, w.color.id).unwrap();

    let a = variant(&w.store, &w.shirt, "TS-RED");
    let b = variant(&w.store, &hoodie, "HD-RED");
    w.store.link_attribute_value(a.id, w.red.id).unwrap();
    w.store.link_attribute_value(b.id, w.red.id).unwrap();
}

#[test]
fn unlink_into_sibling_combination_is_rejected() {
    let w = wardrobe();
    let v1 = variant(&w.store, &w.shirt, "TS-RED");
    w.store.link_attribute_value(v1.id, w.red.id).unwrap();

    let v2 = variant(&w.store, &w.shirt, "TS-RED-M");
    let medium = w.store.link_attribute_value(v2.id, w.medium.id).unwrap();
    w.store.link_attribute_value(v2.id, w.red.id).unwrap();

    let err = w.store.unlink_attribute_value(medium.id).unwrap_err();
    assert!(matches!(expect_violation(err), LinkViolation::DuplicateVariantCombination { .. }));

    // Stripping v1 down to nothing is always allowed.
    let red = w.store.variant_links(v1.id).unwrap()[0];
    w.store.unlink_attribute_value(red.id).unwrap();
    w.store.unlink_attribute_value(medium.id).unwrap();
}

#[test]
fn attribute_value_ordering_is_dense_per_attribute() {
    let store = InMemoryCatalogStore::new();
    let size = attribute(&store, "Size", AttributeGroup::Size);
    let color = attribute(&store, "Color", AttributeGroup::Color);

    let orders: Vec<u32> = ["Small", "Medium", "Large"]
        .iter()
        .map(|v| value(&store, &size, v).sort_order)
        .collect();
    assert_eq!(orders, vec![0, 1, 2]);
    assert_eq!(value(&store, &color, "Red").sort_order, 0);

    let listed: Vec<_> = store
        .attribute_values(size.id)
        .unwrap()
        .into_iter()
        .map(|v| v.value)
        .collect();
    assert_eq!(listed, vec!["Small", "Medium", "Large"]);
}

#[test]
fn explicit_sort_order_is_stored_as_given() {
    let w = wardrobe();
    let v = w
        .store
        .create_variant(CreateVariant::new(w.shirt.id, "TS-LAST", 10))
        .unwrap();
    assert_eq!(v.sort_order, 10);
    assert_eq!(w.store.next_variant_sort_order(w.shirt.id).unwrap(), 11);
}

#[test]
fn variants_and_images_follow_dense_ordering() {
    let w = wardrobe();
    let a = variant(&w.store, &w.shirt, "TS-B");
    let b = variant(&w.store, &w.shirt, "TS-A");
    assert_eq!((a.sort_order, b.sort_order), (0, 1));

    for file in ["front.jpg", "back.png"] {
        let sort_order = w.store.next_image_sort_order(w.shirt.id).unwrap();
        w.store
            .add_image(AddProductImage {
                product_id: w.shirt.id,
                variant_id: None,
                file_name: file.to_string(),
                alt_text: String::new(),
                sort_order,
            })
            .unwrap();
    }
    let images = w.store.images(w.shirt.id).unwrap();
    assert_eq!(images.iter().map(|i| i.sort_order).collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(images[0].alt_text, "Image of clothing-t-shirt");
}

#[test]
fn image_variant_must_belong_to_product() {
    let w = wardrobe();
    let hoodie = product(&w.store, &w.clothing, "Hoodie", 4000);
    let foreign = variant(&w.store, &hoodie, "HD-1");
    let err = w
        .store
        .add_image(AddProductImage {
            product_id: w.shirt.id,
            variant_id: Some(foreign.id),
            file_name: "x.jpg".to_string(),
            alt_text: String::new(),
            sort_order: 0,
        })
        .unwrap_err();
    assert!(matches!(err, CatalogError::Domain(DomainError::Validation(_))));
}

#[test]
fn protected_deletes_are_refused() {
    let w = wardrobe();
    let v = variant(&w.store, &w.shirt, "TS-1");
    w.store.link_attribute_value(v.id, w.red.id).unwrap();

    assert!(is_conflict(w.store.delete_category(w.clothing.id)));
    assert!(is_conflict(w.store.delete_attribute_value(w.red.id)));
    assert!(is_conflict(w.store.delete_attribute(w.color.id)));
    assert!(is_conflict(w.store.undeclare_attribute(w.shirt.id, w.color.id)));

    // Size is declared but unused.
    w.store.undeclare_attribute(w.shirt.id, w.size.id).unwrap();
    let err = w.store.link_attribute_value(v.id, w.medium.id).unwrap_err();
    assert!(matches!(expect_violation(err), LinkViolation::AttributeNotApplicable { .. }));
}

#[test]
fn deleting_product_cascades() {
    let w = wardrobe();
    let v = variant(&w.store, &w.shirt, "TS-1");
    w.store.link_attribute_value(v.id, w.red.id).unwrap();

    w.store.delete_product(w.shirt.id).unwrap();
    assert!(is_not_found(w.store.variant(v.id)));
    assert!(w.store.variant_by_sku("TS-1").unwrap().is_none());

    // Nothing references the category, values or attributes any more.
    w.store.delete_attribute_value(w.red.id).unwrap();
    w.store.delete_attribute(w.color.id).unwrap();
    w.store.delete_category(w.clothing.id).unwrap();
}

#[test]
fn listings_filter_and_order() {
    let w = wardrobe();
    let mut cmd = CreateProduct::new(w.clothing.id, "Beanie", Money::from_cents(900));
    cmd.is_featured = true;
    w.store.create_product(cmd).unwrap();
    let mut hidden = CreateProduct::new(w.clothing.id, "Archive", Money::from_cents(1));
    hidden.is_active = false;
    w.store.create_product(hidden).unwrap();

    let names = |q: ProductQuery| -> Vec<String> {
        w.store.products(q).unwrap().into_iter().map(|p| p.name).collect()
    };
    assert_eq!(names(ProductQuery::default()), vec!["Archive", "Beanie", "T-Shirt"]);
    assert_eq!(
        names(ProductQuery {
            category_id: Some(w.clothing.id),
            visibility: Visibility::ActiveOnly,
            featured_only: false,
        }),
        vec!["Beanie", "T-Shirt"]
    );
    assert_eq!(
        names(ProductQuery {
            featured_only: true,
            ..ProductQuery::default()
        }),
        vec!["Beanie"]
    );
    assert_eq!(
        w.store
            .product_attributes(w.shirt.id)
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect::<Vec<_>>(),
        vec!["Color", "Size"]
    );
}

#[test]
fn concurrent_conflicting_links_admit_one_winner() {
    let w = wardrobe();
    let store = Arc::new(w.store);
    let variants: Vec<_> = (0..8)
        .map(|i| variant(&store, &w.shirt, &format!("TS-{i}")))
        .collect();

    let handles: Vec<_> = variants
        .iter()
        .map(|v| {
            let store = store.clone();
            let (variant_id, red) = (v.id, w.red.id);
            std::thread::spawn(move || store.link_attribute_value(variant_id, red).is_ok())
        })
        .collect();
    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();
    assert_eq!(winners, 1);
}

#[tokio::test]
async fn cart_priced_with_effective_prices() {
    let w = wardrobe();
    let plain = variant(&w.store, &w.shirt, "TS-PLAIN");
    let premium = w
        .store
        .create_variant(CreateVariant {
            price_override: Some(Money::from_cents(2500)),
            ..CreateVariant::new(w.shirt.id, "TS-PREMIUM", 1)
        })
        .unwrap();

    let carts = InMemoryCartStore::new();
    let owner = CartOwner::session("sess-1").unwrap();
    let mut cart = carts.open_cart_for(&owner).unwrap();
    cart.add_item(plain.id, 2, chrono::Utc::now()).unwrap();
    cart.add_item(premium.id, 1, chrono::Utc::now()).unwrap();
    carts.save(&cart).unwrap();

    let stored = carts.get(cart.id_typed()).unwrap();
    let totals = price_cart(&w.store, &stored).await.unwrap();
    assert_eq!(totals.total, Money::from_cents(2 * 1500 + 2500));
    assert_eq!(totals.item_count, 3);
}

#[tokio::test]
async fn deleting_variant_drops_its_cart_lines() {
    let w = wardrobe();
    let kept = variant(&w.store, &w.shirt, "TS-KEPT");
    let gone = variant(&w.store, &w.shirt, "TS-GONE");

    let carts = InMemoryCartStore::new();
    let mut open = carts.open_cart_for(&CartOwner::session("sess-3").unwrap()).unwrap();
    open.add_item(kept.id, 1, chrono::Utc::now()).unwrap();
    open.add_item(gone.id, 4, chrono::Utc::now()).unwrap();
    carts.save(&open).unwrap();
    let mut other = carts.open_cart_for(&CartOwner::session("sess-4").unwrap()).unwrap();
    other.add_item(gone.id, 1, chrono::Utc::now()).unwrap();
    carts.save(&other).unwrap();

    let removed = lifecycle::delete_variant(&w.store, &carts, gone.id).await.unwrap();
    assert_eq!(removed, 2);
    assert!(is_not_found(w.store.variant(gone.id)));

    let open = carts.get(open.id_typed()).unwrap();
    assert!(open.item_for(gone.id).is_none());
    let totals = price_cart(&w.store, &open).await.unwrap();
    assert_eq!(totals.total, Money::from_cents(1500));
    assert!(carts.get(other.id_typed()).unwrap().is_empty());

    // A failed catalog delete leaves carts alone.
    let mut again = carts.get(open.id_typed()).unwrap();
    again.add_item(gone.id, 1, chrono::Utc::now()).unwrap();
    carts.save(&again).unwrap();
    let err = lifecycle::delete_variant(&w.store, &carts, gone.id).await;
    assert!(is_not_found(err));
    assert!(carts.get(open.id_typed()).unwrap().item_for(gone.id).is_some());
}

#[tokio::test]
async fn deleting_product_drops_cart_lines_of_every_variant() {
    let w = wardrobe();
    let hoodie = product(&w.store, &w.clothing, "Hoodie", 4000);
    let a = variant(&w.store, &w.shirt, "TS-A");
    let b = variant(&w.store, &w.shirt, "TS-B");
    let h = variant(&w.store, &hoodie, "HD-1");

    let carts = InMemoryCartStore::new();
    let mut cart = carts.open_cart_for(&CartOwner::session("sess-5").unwrap()).unwrap();
    for id in [a.id, b.id, h.id] {
        cart.add_item(id, 1, chrono::Utc::now()).unwrap();
    }
    carts.save(&cart).unwrap();

    let removed = lifecycle::delete_product(&w.store, &carts, w.shirt.id).await.unwrap();
    assert_eq!(removed, 2);
    let cart = carts.get(cart.id_typed()).unwrap();
    assert_eq!(cart.items().len(), 1);
    let totals = price_cart(&w.store, &cart).await.unwrap();
    assert_eq!(totals.total, Money::from_cents(4000));
}

#[test]
fn one_open_cart_per_owner() {
    let carts = InMemoryCartStore::new();
    let owner = CartOwner::session("sess-2").unwrap();
    let first = carts.open_cart_for(&owner).unwrap();
    assert_eq!(carts.open_cart_for(&owner).unwrap().id_typed(), first.id_typed());

    let rogue = storefront_cart::Cart::open(owner.clone(), chrono::Utc::now());
    assert!(carts.save(&rogue).unwrap_err().is_uniqueness());

    let mut done = first.clone();
    let item = storefront_catalog::VariantId::new();
    done.add_item(item, 1, chrono::Utc::now()).unwrap();
    done.checkout(chrono::Utc::now()).unwrap();
    carts.save(&done).unwrap();

    let next = carts.open_cart_for(&owner).unwrap();
    assert_ne!(next.id_typed(), first.id_typed());
    assert_eq!(carts.get(first.id_typed()).unwrap().status(), CartStatus::CheckedOut);
    assert_eq!(carts.carts_of(&owner).unwrap().len(), 2);
}

#[test]
fn user_emails_are_unique_ignoring_case() {
    let users = InMemoryUserStore::new();
    let ada = users
        .register(RegisterUser::customer("ada@example.com", "Ada", "Lovelace"))
        .unwrap();
    let err = users
        .register(RegisterUser::customer("ADA@Example.com", "Ada", "Byron"))
        .unwrap_err();
    assert!(err.is_uniqueness());

    let found = users.find_by_email(" Ada@EXAMPLE.com").unwrap();
    assert_eq!(found.map(|u| u.id), Some(ada.id));
    assert!(PasswordPolicy::default().validate("lovelace", Some(&ada)).is_err());
    assert!(PasswordPolicy::default().validate("Tr1cky-Horse", Some(&ada)).is_ok());

    let deactivated = users.deactivate(ada.id).unwrap();
    assert!(!deactivated.is_active);
}

/// Live store when `STOREFRONT_TEST_DATABASE_URL` is set.
async fn postgres_store() -> Option<PostgresCatalogStore> {
    let database_url = std::env::var("STOREFRONT_TEST_DATABASE_URL").ok()?;
    let config = crate::InfraConfig {
        store: crate::StoreKind::Postgres { database_url },
        max_connections: 2,
    };
    let backend = crate::CatalogBackend::connect(&config).await.unwrap();
    backend.postgres().cloned()
}

/// Unique suffix so reruns against the same database do not collide.
fn run_tag() -> String {
    storefront_catalog::CategoryId::new().to_string()
}

async fn pg_value(
    store: &PostgresCatalogStore,
    attribute: &Attribute,
    text: &str,
) -> AttributeValue {
    let sort_order = store.next_attribute_value_sort_order(attribute.id).await.unwrap();
    store
        .create_attribute_value(CreateAttributeValue {
            attribute_id: attribute.id,
            value: text.to_string(),
            sort_order,
        })
        .await
        .unwrap()
}

async fn pg_variant(
    store: &PostgresCatalogStore,
    product: &Product,
    sku: String,
) -> ProductVariant {
    let sort_order = store.next_variant_sort_order(product.id).await.unwrap();
    store
        .create_variant(CreateVariant::new(product.id, sku, sort_order))
        .await
        .unwrap()
}

#[tokio::test]
async fn postgres_store_enforces_link_rules() {
    let Some(store) = postgres_store().await else {
        return;
    };
    let tag = run_tag();
    let clothing = store
        .create_category(CreateCategory::named(format!("Clothing {tag}")))
        .await
        .unwrap();
    let color_name = format!("Color {tag}");
    let color = store
        .create_attribute(CreateAttribute::new(color_name.clone(), AttributeGroup::Color))
        .await
        .unwrap();
    let values = vec![
        pg_value(&store, &color, "Red").await,
        pg_value(&store, &color, "Blue").await,
    ];
    assert_eq!(values.iter().map(|v| v.sort_order).collect::<Vec<_>>(), vec![0, 1]);

    let shouted = CreateAttribute::new(color_name.to_uppercase(), AttributeGroup::Color);
    let case_clash = store.create_attribute(shouted).await.unwrap_err();
    assert!(case_clash.is_uniqueness());

    let name = format!("T-Shirt {tag}");
    let shirt = store
        .create_product(CreateProduct::new(clothing.id, name, Money::from_cents(1500)))
        .await
        .unwrap();
    store.declare_attribute(shirt.id, color.id).await.unwrap();
    let again = store.declare_attribute(shirt.id, color.id).await.unwrap_err();
    assert!(again.is_uniqueness());

    let v1 = pg_variant(&store, &shirt, format!("{tag}-1")).await;
    let v2 = pg_variant(&store, &shirt, format!("{tag}-2")).await;
    assert_eq!(store.next_variant_sort_order(shirt.id).await.unwrap(), 2);

    let link = store.link_attribute_value(v1.id, values[0].id).await.unwrap();
    let err = store.link_attribute_value(v2.id, values[0].id).await.unwrap_err();
    assert!(matches!(expect_violation(err), LinkViolation::DuplicateVariantCombination { .. }));
    let err = store.link_attribute_value(v1.id, values[1].id).await.unwrap_err();
    assert!(matches!(expect_violation(err), LinkViolation::DuplicateAttributeAssignment { .. }));

    store.relink_attribute_value(link.id, values[1].id).await.unwrap();
    store.link_attribute_value(v2.id, values[0].id).await.unwrap();
    assert_eq!(store.variant_links(v2.id).await.unwrap().len(), 1);

    assert!(is_conflict(store.delete_category(clothing.id).await));
    store.delete_product(shirt.id).await.unwrap();
    store.delete_category(clothing.id).await.unwrap();
}

#[tokio::test]
async fn postgres_unlink_and_relink_guard_sibling_combinations() {
    let Some(store) = postgres_store().await else {
        return;
    };
    let tag = run_tag();
    let clothing = store
        .create_category(CreateCategory::named(format!("Clothing {tag}")))
        .await
        .unwrap();
    let color = store
        .create_attribute(CreateAttribute::new(format!("Color {tag}"), AttributeGroup::Color))
        .await
        .unwrap();
    let size = store
        .create_attribute(CreateAttribute::new(format!("Size {tag}"), AttributeGroup::Size))
        .await
        .unwrap();
    let red = pg_value(&store, &color, "Red").await;
    let blue = pg_value(&store, &color, "Blue").await;
    let medium = pg_value(&store, &size, "Medium").await;
    let shirt = store
        .create_product(CreateProduct::new(clothing.id, "T-Shirt", Money::from_cents(1500)))
        .await
        .unwrap();
    store.declare_attribute(shirt.id, color.id).await.unwrap();
    store.declare_attribute(shirt.id, size.id).await.unwrap();

    let v1 = pg_variant(&store, &shirt, format!("{tag}-RED")).await;
    let v1_red = store.link_attribute_value(v1.id, red.id).await.unwrap();
    let v2 = pg_variant(&store, &shirt, format!("{tag}-BLUE-M")).await;
    store.link_attribute_value(v2.id, medium.id).await.unwrap();
    store.link_attribute_value(v2.id, blue.id).await.unwrap();

    // v3 = {Medium, Red}; relinking its Red to Blue would equal v2.
    let v3 = pg_variant(&store, &shirt, format!("{tag}-RED-M")).await;
    store.link_attribute_value(v3.id, medium.id).await.unwrap();
    let v3_red = store.link_attribute_value(v3.id, red.id).await.unwrap();
    let err = store.relink_attribute_value(v3_red.id, blue.id).await.unwrap_err();
    assert!(matches!(expect_violation(err), LinkViolation::DuplicateVariantCombination { .. }));
    let same = store.relink_attribute_value(v3_red.id, red.id).await.unwrap();
    assert_eq!(same, v3_red);

    // v3 without Medium would equal v1 = {Red}.
    let v3_medium = store.variant_links(v3.id).await.unwrap();
    let v3_medium = v3_medium.iter().find(|l| l.attribute_value_id == medium.id).unwrap();
    let err = store.unlink_attribute_value(v3_medium.id).await.unwrap_err();
    assert!(matches!(expect_violation(err), LinkViolation::DuplicateVariantCombination { .. }));
    assert_eq!(store.variant_links(v3.id).await.unwrap().len(), 2);

    // Once v1 is empty the same unlink goes through.
    store.unlink_attribute_value(v1_red.id).await.unwrap();
    assert!(store.variant_links(v1.id).await.unwrap().is_empty());
    store.unlink_attribute_value(v3_medium.id).await.unwrap();
    assert!(is_not_found(store.unlink_attribute_value(v3_medium.id).await));

    store.delete_product(shirt.id).await.unwrap();
    store.delete_category(clothing.id).await.unwrap();
}

#[tokio::test]
async fn postgres_store_covers_listings_images_and_deletes() {
    let Some(store) = postgres_store().await else {
        return;
    };
    let tag = run_tag();
    let clothing = store
        .create_category(CreateCategory::named(format!("Clothing {tag}")))
        .await
        .unwrap();
    let color = store
        .create_attribute(CreateAttribute::new(format!("Color {tag}"), AttributeGroup::Color))
        .await
        .unwrap();
    let red = pg_value(&store, &color, "Red").await;
    assert_eq!(store.attribute_value(red.id).await.unwrap(), red);
    assert!(store.attributes().await.unwrap().iter().any(|a| a.id == color.id));

    let mut featured = CreateProduct::new(clothing.id, "Beanie", Money::from_cents(900));
    featured.is_featured = true;
    let beanie = store.create_product(featured).await.unwrap();
    let shirt = store
        .create_product(CreateProduct::new(clothing.id, "T-Shirt", Money::from_cents(1500)))
        .await
        .unwrap();
    let in_clothing = ProductQuery {
        category_id: Some(clothing.id),
        ..ProductQuery::default()
    };
    let names: Vec<_> = store
        .products(in_clothing)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["Beanie", "T-Shirt"]);
    let featured = store
        .products(ProductQuery {
            featured_only: true,
            ..in_clothing
        })
        .await
        .unwrap();
    assert_eq!(featured.into_iter().map(|p| p.id).collect::<Vec<_>>(), vec![beanie.id]);

    store.declare_attribute(shirt.id, color.id).await.unwrap();
    let declared = store.product_attributes(shirt.id).await.unwrap();
    assert_eq!(declared.into_iter().map(|a| a.id).collect::<Vec<_>>(), vec![color.id]);

    let sku = format!("{tag}-RED");
    let v = pg_variant(&store, &shirt, sku.clone()).await;
    store.link_attribute_value(v.id, red.id).await.unwrap();
    let by_sku = store.variant_by_sku(&sku).await.unwrap();
    assert_eq!(by_sku.map(|found| found.id), Some(v.id));
    assert_eq!(store.set_stock_quantity(v.id, 7).await.unwrap().stock_quantity, 7);
    assert_eq!(store.variant(v.id).await.unwrap().stock_quantity, 7);

    assert_eq!(store.next_image_sort_order(shirt.id).await.unwrap(), 0);
    let image = store
        .add_image(AddProductImage {
            product_id: shirt.id,
            variant_id: Some(v.id),
            file_name: "front.jpg".to_string(),
            alt_text: String::new(),
            sort_order: 0,
        })
        .await
        .unwrap();
    assert_eq!(image.alt_text, format!("Image of {} (SKU: {sku})", shirt.slug));
    assert_eq!(store.images(shirt.id).await.unwrap(), vec![image]);
    assert_eq!(store.next_image_sort_order(shirt.id).await.unwrap(), 1);

    assert!(is_conflict(store.undeclare_attribute(shirt.id, color.id).await));
    assert!(is_conflict(store.delete_attribute_value(red.id).await));
    assert!(is_conflict(store.delete_attribute(color.id).await));

    let carts = InMemoryCartStore::new();
    let mut cart = carts.open_cart_for(&CartOwner::session("pg-sess").unwrap()).unwrap();
    cart.add_item(v.id, 2, chrono::Utc::now()).unwrap();
    carts.save(&cart).unwrap();
    assert_eq!(price_cart(&store, &cart).await.unwrap().total, Money::from_cents(3000));

    assert_eq!(lifecycle::delete_variant(&store, &carts, v.id).await.unwrap(), 1);
    assert!(store.images(shirt.id).await.unwrap().is_empty());
    assert!(store.variant_by_sku(&sku).await.unwrap().is_none());
    assert!(carts.get(cart.id_typed()).unwrap().is_empty());

    store.undeclare_attribute(shirt.id, color.id).await.unwrap();
    assert!(is_not_found(store.undeclare_attribute(shirt.id, color.id).await));
    store.delete_attribute_value(red.id).await.unwrap();
    store.delete_attribute(color.id).await.unwrap();
    assert!(is_not_found(store.delete_attribute(color.id).await));

    store.delete_product(beanie.id).await.unwrap();
    store.delete_product(shirt.id).await.unwrap();
    store.delete_category(clothing.id).await.unwrap();
}
