use agrimix_engine::recompute_all;
use agrimix_model::{
    CustomerId, CustomerKind, NutrientValues, OrderStatus, PackageId, PackageUnit, PriceState,
    StockItemId,
};
use agrimix_store::{
    bootstrap, copy_recipe, create_customer, create_bulk_customers, create_order, create_package,
    create_recipe, create_stock_item, delete_customer, delete_recipe, delete_stock_item,
    get_customer, get_recipe, get_stock_item, list_customers, list_packages, list_recipes,
    list_stale_recipes, list_stock, set_package_price, set_stock_price, update_order_status,
    update_recipe, CustomerFilter, CustomerInput, IngredientInput, OrderInput, PackageInput,
    RecipeInput, Scope, StockItemInput, StoreError,
};
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::Connection;

fn setup_db() -> Connection {
    let conn = Connection::open_in_memory().expect("open memory db");
    bootstrap(&conn).expect("bootstrap");
    conn
}

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 10, 14, 30, 0).unwrap()
}

fn customer_input(name: &str) -> CustomerInput {
    CustomerInput {
        name: name.to_string(),
        kind: CustomerKind::Buyer,
        email: None,
        phone: None,
        address: None,
    }
}

fn recipe_input(customer: CustomerId, lines: &[(i64, f64)]) -> RecipeInput {
    RecipeInput {
        name: "NPK 20-20-20".to_string(),
        customer_id: customer,
        density: Some("1.32".to_string()),
        packages: vec![PackageId::new(1)],
        ingredients: lines
            .iter()
            .map(|(stock_id, quantity)| IngredientInput {
                stock_id: StockItemId::new(*stock_id),
                quantity: *quantity,
            })
            .collect(),
    }
}

#[test]
fn bootstrap_seeds_defaults_once() {
    let conn = setup_db();
    assert_eq!(list_stock(&conn, Scope::ActiveOnly).expect("stock").len(), 5);
    assert_eq!(
        list_packages(&conn, Scope::ActiveOnly).expect("packages").len(),
        4
    );

    // bootstrap is idempotent on an already-seeded database
    bootstrap(&conn).expect("second bootstrap");
    assert_eq!(list_stock(&conn, Scope::ActiveOnly).expect("stock").len(), 5);
    assert_eq!(
        list_packages(&conn, Scope::ActiveOnly).expect("packages").len(),
        4
    );
}

#[test]
fn customer_names_collide_case_insensitively() {
    let conn = setup_db();
    create_customer(&conn, &customer_input("Acme")).expect("create Acme");

    let err = create_customer(&conn, &customer_input("acme")).expect_err("duplicate");
    assert!(matches!(err, StoreError::DuplicateName { .. }));

    // a soft-deleted row frees its name
    let acme = &list_customers(&conn, &CustomerFilter::default(), Scope::ActiveOnly)
        .expect("list")[0];
    delete_customer(&conn, acme.id, fixed_now()).expect("delete");
    create_customer(&conn, &customer_input("ACME")).expect("name freed");
}

#[test]
fn customer_listing_honours_scope_and_filters() {
    let conn = setup_db();
    let kept = create_customer(&conn, &customer_input("Green Fields")).expect("create");
    let dropped = create_customer(
        &conn,
        &CustomerInput {
            kind: CustomerKind::Supplier,
            ..customer_input("Hidden Agro")
        },
    )
    .expect("create");
    delete_customer(&conn, dropped.id, fixed_now()).expect("delete");

    let active = list_customers(&conn, &CustomerFilter::default(), Scope::ActiveOnly)
        .expect("active list");
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, kept.id);

    let all = list_customers(&conn, &CustomerFilter::default(), Scope::IncludeDeleted)
        .expect("full list");
    assert_eq!(all.len(), 2);

    let filtered = list_customers(
        &conn,
        &CustomerFilter {
            search: Some("green".to_string()),
            kind: None,
        },
        Scope::ActiveOnly,
    )
    .expect("search");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].name, "Green Fields");

    assert!(get_customer(&conn, dropped.id, Scope::ActiveOnly).is_err());
    assert!(get_customer(&conn, dropped.id, Scope::IncludeDeleted).is_ok());
}

#[test]
fn bulk_customers_reject_payload_duplicates_without_writing() {
    let mut conn = setup_db();
    let err = create_bulk_customers(
        &mut conn,
        &[customer_input("One"), customer_input("oNe")],
    )
    .expect_err("payload duplicate");
    assert!(matches!(err, StoreError::DuplicateName { .. }));
    assert!(list_customers(&conn, &CustomerFilter::default(), Scope::ActiveOnly)
        .expect("list")
        .is_empty());

    let added = create_bulk_customers(
        &mut conn,
        &[customer_input("One"), customer_input("Two")],
    )
    .expect("bulk insert");
    assert_eq!(added, 2);
}

#[test]
fn package_size_unit_pair_is_unique_among_live_rows() {
    let conn = setup_db();
    let err = create_package(
        &conn,
        &PackageInput {
            size: 5.0,
            unit: PackageUnit::Litre,
            price: 6.0,
        },
    )
    .expect_err("seeded 5 L exists");
    assert!(matches!(err, StoreError::DuplicatePackage { .. }));

    // same size under the other unit is a different package
    create_package(
        &conn,
        &PackageInput {
            size: 5.0,
            unit: PackageUnit::Kilogram,
            price: 6.0,
        },
    )
    .expect("5 Kg is free");
}

#[test]
fn stock_price_rejects_negative_and_nan_without_writing() {
    let mut conn = setup_db();
    let before = get_stock_item(&conn, StockItemId::new(1), Scope::ActiveOnly)
        .expect("seeded MAP")
        .price;

    assert!(set_stock_price(&mut conn, StockItemId::new(1), -1.0, fixed_now()).is_err());
    assert!(set_stock_price(&mut conn, StockItemId::new(1), f64::NAN, fixed_now()).is_err());

    let after = get_stock_item(&conn, StockItemId::new(1), Scope::ActiveOnly)
        .expect("seeded MAP")
        .price;
    assert_eq!(before, after);
}

#[test]
fn recipe_creation_costs_from_the_ledger_and_starts_fresh() {
    let mut conn = setup_db();
    let customer = create_customer(&conn, &customer_input("Acme")).expect("customer");

    // seeded prices: MAP=15 (id 1), Urea=8 (id 3)
    let details = create_recipe(
        &mut conn,
        &recipe_input(customer.id, &[(1, 10.0), (3, 5.0)]),
        fixed_now(),
    )
    .expect("create recipe");

    assert_eq!(details.recipe.total_cost, 190.0);
    assert_eq!(details.recipe.price_state, PriceState::Fresh);
    assert_eq!(details.recipe.last_price_update, Some(fixed_now()));
    assert_eq!(details.ingredients.len(), 2);
    assert_eq!(details.ingredients[0].unit_price, 15.0);
    assert_eq!(details.ingredients[0].line_total, 150.0);
    assert_eq!(details.packages, vec![PackageId::new(1)]);
    assert_eq!(details.customer_name.as_deref(), Some("Acme"));
}

#[test]
fn price_change_marks_stale_and_recompute_clears_it() {
    let mut conn = setup_db();
    let customer = create_customer(&conn, &customer_input("Acme")).expect("customer");
    let with_map = create_recipe(
        &mut conn,
        &recipe_input(customer.id, &[(1, 10.0)]),
        fixed_now(),
    )
    .expect("recipe using MAP");
    let without_map = create_recipe(
        &mut conn,
        &recipe_input(customer.id, &[(3, 4.0)]),
        fixed_now(),
    )
    .expect("recipe using Urea");

    let previous =
        set_stock_price(&mut conn, StockItemId::new(1), 20.0, fixed_now()).expect("set price");
    assert_eq!(previous, 15.0);

    let stale = list_stale_recipes(&conn).expect("stale listing");
    assert_eq!(stale.len(), 1);
    assert_eq!(stale[0].recipe.id, with_map.recipe.id);

    let updated = recompute_all(&mut conn, fixed_now()).expect("recompute");
    assert_eq!(updated, 2);
    assert!(list_stale_recipes(&conn).expect("stale listing").is_empty());

    let refreshed = get_recipe(&conn, with_map.recipe.id, Scope::ActiveOnly).expect("get");
    assert_eq!(refreshed.recipe.total_cost, 200.0);
    let untouched = get_recipe(&conn, without_map.recipe.id, Scope::ActiveOnly).expect("get");
    assert_eq!(untouched.recipe.total_cost, 32.0);
}

#[test]
fn package_price_change_also_marks_stale() {
    let mut conn = setup_db();
    let customer = create_customer(&conn, &customer_input("Acme")).expect("customer");
    let recipe = create_recipe(
        &mut conn,
        &recipe_input(customer.id, &[(1, 2.0)]),
        fixed_now(),
    )
    .expect("recipe");

    let previous = set_package_price(&mut conn, PackageId::new(1), 3.75).expect("set price");
    assert_eq!(previous, 2.5);

    let stale = list_stale_recipes(&conn).expect("stale listing");
    assert_eq!(stale.len(), 1);
    assert_eq!(stale[0].recipe.id, recipe.recipe.id);

    // packaging never enters the recompute total
    recompute_all(&mut conn, fixed_now()).expect("recompute");
    let refreshed = get_recipe(&conn, recipe.recipe.id, Scope::ActiveOnly).expect("get");
    assert_eq!(refreshed.recipe.total_cost, 30.0);
}

#[test]
fn recipe_update_replaces_owned_rows_and_recomputes() {
    let mut conn = setup_db();
    let customer = create_customer(&conn, &customer_input("Acme")).expect("customer");
    let created = create_recipe(
        &mut conn,
        &recipe_input(customer.id, &[(1, 10.0)]),
        fixed_now(),
    )
    .expect("create");

    let mut input = recipe_input(customer.id, &[(3, 5.0)]);
    input.packages = vec![PackageId::new(2)];
    let updated =
        update_recipe(&mut conn, created.recipe.id, &input, fixed_now()).expect("update");

    assert_eq!(updated.ingredients.len(), 1);
    assert_eq!(updated.ingredients[0].stock_id, StockItemId::new(3));
    assert_eq!(updated.recipe.total_cost, 40.0);
    assert_eq!(updated.packages, vec![PackageId::new(2)]);
}

#[test]
fn recipe_copy_appends_marker_and_duplicates_rows() {
    let mut conn = setup_db();
    let customer = create_customer(&conn, &customer_input("Acme")).expect("customer");
    let source = create_recipe(
        &mut conn,
        &recipe_input(customer.id, &[(1, 10.0), (3, 5.0)]),
        fixed_now(),
    )
    .expect("create");

    let copy = copy_recipe(&mut conn, source.recipe.id, fixed_now()).expect("copy");
    assert_eq!(copy.recipe.name, "NPK 20-20-20 (copy)");
    assert_ne!(copy.recipe.id, source.recipe.id);
    assert_eq!(copy.ingredients.len(), 2);
    assert_eq!(copy.packages, source.packages);
    assert_eq!(copy.recipe.total_cost, source.recipe.total_cost);
    assert_eq!(copy.recipe.price_state, PriceState::Fresh);
}

#[test]
fn recipe_delete_is_soft_but_owned_rows_go_away() {
    let mut conn = setup_db();
    let customer = create_customer(&conn, &customer_input("Acme")).expect("customer");
    let created = create_recipe(
        &mut conn,
        &recipe_input(customer.id, &[(1, 10.0)]),
        fixed_now(),
    )
    .expect("create");

    delete_recipe(&mut conn, created.recipe.id, fixed_now()).expect("delete");

    assert!(get_recipe(&conn, created.recipe.id, Scope::ActiveOnly).is_err());
    let ghost = get_recipe(&conn, created.recipe.id, Scope::IncludeDeleted).expect("ghost");
    assert!(ghost.ingredients.is_empty());
    assert!(ghost.packages.is_empty());
    assert!(list_recipes(&conn, Scope::ActiveOnly).expect("list").is_empty());
}

#[test]
fn recipe_refuses_soft_deleted_materials_for_new_composition() {
    let mut conn = setup_db();
    let customer = create_customer(&conn, &customer_input("Acme")).expect("customer");
    delete_stock_item(&conn, StockItemId::new(1), fixed_now()).expect("soft delete MAP");

    let err = create_recipe(
        &mut conn,
        &recipe_input(customer.id, &[(1, 10.0)]),
        fixed_now(),
    )
    .expect_err("deleted material");
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn soft_deleting_a_used_material_keeps_existing_recipes_costable() {
    let mut conn = setup_db();
    let customer = create_customer(&conn, &customer_input("Acme")).expect("customer");
    let mut input = recipe_input(customer.id, &[(1, 10.0), (3, 5.0)]);
    input.name = "mixed".to_string();
    let recipe = create_recipe(&mut conn, &input, fixed_now()).expect("create");

    delete_stock_item(&conn, StockItemId::new(1), fixed_now()).expect("soft delete MAP");

    // nutrients drop the deleted material, cost still uses its ledger row
    let details = get_recipe(&conn, recipe.recipe.id, Scope::ActiveOnly).expect("get");
    assert_eq!(details.recipe.total_cost, 190.0);
    let updated = recompute_all(&mut conn, fixed_now()).expect("recompute");
    assert_eq!(updated, 1);
    let details = get_recipe(&conn, recipe.recipe.id, Scope::ActiveOnly).expect("get");
    assert_eq!(details.recipe.total_cost, 190.0);
}

#[test]
fn nutrient_aggregate_is_quantity_weighted() {
    let mut conn = setup_db();
    let customer = create_customer(&conn, &customer_input("Acme")).expect("customer");

    let rich = create_stock_item(
        &conn,
        &StockItemInput {
            name: "N-rich".to_string(),
            code: None,
            quantity: 100.0,
            min_quantity: 0.0,
            unit: "kg".to_string(),
            category: "raw_material".to_string(),
            price: 4.0,
            nutrients: NutrientValues {
                n: Some(30.0),
                ..NutrientValues::default()
            },
        },
    )
    .expect("material");
    let plain = create_stock_item(
        &conn,
        &StockItemInput {
            name: "Filler".to_string(),
            code: None,
            quantity: 100.0,
            min_quantity: 0.0,
            unit: "kg".to_string(),
            category: "raw_material".to_string(),
            price: 1.0,
            nutrients: NutrientValues::default(),
        },
    )
    .expect("material");

    let details = create_recipe(
        &mut conn,
        &recipe_input(customer.id, &[(rich.id.as_i64(), 1.0), (plain.id.as_i64(), 3.0)]),
        fixed_now(),
    )
    .expect("recipe");

    // (1*30 + 3*nothing) / 4
    assert_eq!(details.nutrients.value("n_content"), 7.5);
    assert_eq!(details.nutrients.value("p_content"), 0.0);
}

#[test]
fn order_workflow_is_forward_only() {
    let mut conn = setup_db();
    let customer = create_customer(&conn, &customer_input("Acme")).expect("customer");
    let recipe = create_recipe(
        &mut conn,
        &recipe_input(customer.id, &[(1, 1.0)]),
        fixed_now(),
    )
    .expect("recipe");

    let order = create_order(
        &conn,
        &OrderInput {
            customer_id: customer.id,
            recipe_id: recipe.recipe.id,
            quantity: 100.0,
            total: 1500.0,
            status: OrderStatus::Pending,
        },
    )
    .expect("order");
    assert_eq!(order.status, OrderStatus::Pending);

    let confirmed =
        update_order_status(&conn, order.id, OrderStatus::Confirmed).expect("confirm");
    assert_eq!(confirmed.status, OrderStatus::Confirmed);

    let err = update_order_status(&conn, order.id, OrderStatus::Cancelled)
        .expect_err("terminal state");
    assert!(matches!(err, StoreError::InvalidTransition { .. }));
}
