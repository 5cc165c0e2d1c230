use serde_json::json;
use sportscomp_rust::auth::Role;
use sportscomp_rust::draft::{EventDraft, InfoDraft, MediaDraft, MediaRow, PricingDraft, TicketRow, WizardState};
use sportscomp_rust::SportsComp;
use wiremock::matchers::{any, body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn valid_info() -> InfoDraft {
    InfoDraft {
        title: "Tournoi de padel de Tunis".to_string(),
        short_description: "Tableau hommes A".to_string(),
        description: "Deux jours de matchs au complexe El Menzah.".to_string(),
        sport_id: "3".to_string(),
        category_id: "14".to_string(),
        start_date: "2025-06-01".to_string(),
        start_time: "09:00".to_string(),
        end_date: "2025-06-02".to_string(),
        end_time: "18:00".to_string(),
        venue_name: "Complexe sportif El Menzah".to_string(),
        address_line1: "Avenue Mohamed V".to_string(),
        city: "Tunis".to_string(),
        ..InfoDraft::default()
    }
}

fn event_record(id: i64, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": "Tournoi de padel de Tunis",
        "short_description": "Tableau hommes A",
        "description": "Deux jours de matchs au complexe El Menzah.",
        "sport": 3,
        "category": 14,
        "event_type": "tournament",
        "level_required": "all",
        "start_at": "2025-06-01T09:00:00Z",
        "end_at": "2025-06-02T18:00:00Z",
        "timezone": "UTC",
        "location": {
            "venue_name": "Complexe sportif El Menzah",
            "address_line1": "Avenue Mohamed V",
            "address_line2": "",
            "city": "Tunis",
            "region": "",
            "country": "Tunisie",
            "postal_code": "",
            "latitude": null,
            "longitude": null
        },
        "capacity_total": 64,
        "is_free": false,
        "currency": "TND",
        "cancellation_policy": "",
        "cancellation_public": false,
        "cover_image_url": "",
        "status": status
    })
}

fn event_detail(id: i64, cover: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": "Tournoi de padel de Tunis",
        "slug": "tournoi-padel-de-tunis",
        "short_description": "Tableau hommes A",
        "description": "Deux jours de matchs au complexe El Menzah.",
        "sport": {"id": 3, "name": "Padel", "slug": "padel"},
        "category": {"id": 14, "sport": 3, "sport_name": "Padel", "name": "Hommes A", "slug": "hommes-a"},
        "event_type": "tournament",
        "level_required": "all",
        "start_at": "2025-06-01T09:00:00Z",
        "end_at": "2025-06-02T18:00:00Z",
        "timezone": "UTC",
        "location": {
            "venue_name": "Complexe sportif El Menzah",
            "address_line1": "Avenue Mohamed V",
            "address_line2": "",
            "city": "Tunis",
            "region": "",
            "country": "Tunisie",
            "postal_code": "",
            "latitude": null,
            "longitude": null
        },
        "capacity_total": 64,
        "capacity_reserved": 0,
        "capacity_available": 64,
        "is_free": false,
        "currency": "TND",
        "cancellation_policy": "",
        "cancellation_public": false,
        "cover_image_url": cover,
        "status": "draft",
        "published_at": null,
        "organizer_name": "Club El Menzah",
        "ticket_types": [],
        "media": []
    })
}

fn ticket(id: i64, name: &str, price: &str, quantity: i64) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "price": price,
        "quantity_total": quantity,
        "quantity_sold": 0,
        "sales_start": null,
        "sales_end": null,
        "is_refundable": false
    })
}

fn media_item(id: i64, url: &str, sort_order: i64) -> serde_json::Value {
    json!({
        "id": id,
        "media_type": "image",
        "url": url,
        "title": "Affiche",
        "is_cover": false,
        "sort_order": sort_order,
        "created_at": "2025-05-01T10:00:00Z"
    })
}

async fn organizer_client(server: &MockServer) -> SportsComp {
    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 12,
            "email": "sami@example.com",
            "role": "organizer",
            "full_name": "Sami Trabelsi",
            "handle": "sami",
            "access": "access-1",
            "refresh": "refresh-1"
        })))
        .mount(server)
        .await;

    let client = SportsComp::new(&server.uri());
    client
        .auth()
        .login("sami@example.com", "secret123", Role::Organizer)
        .await
        .unwrap();
    client
}

async fn mock_create_event(server: &MockServer, id: i64) {
    Mock::given(method("POST"))
        .and(path("/api/marketplace/organizer/events/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(event_record(id, "draft")))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_submit_info_creates_the_event_and_caches_its_id() {
    let server = MockServer::start().await;
    let client = organizer_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/marketplace/organizer/events/"))
        .and(body_partial_json(json!({
            "title": "Tournoi de padel de Tunis",
            "sport": 3,
            "category": 14,
            "start_at": "2025-06-01T09:00:00Z",
            "end_at": "2025-06-02T18:00:00Z",
            "status": "draft",
            "location": {"venue_name": "Complexe sportif El Menzah", "city": "Tunis", "country": "Tunisie"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(event_record(55, "draft")))
        .expect(1)
        .mount(&server)
        .await;

    let wizard = client.wizard();
    assert_eq!(wizard.state(), WizardState::Empty);

    let draft = wizard.submit_info(&valid_info()).await.unwrap();

    assert_eq!(draft.event_id, Some(55));
    assert_eq!(draft.info.title, "Tournoi de padel de Tunis");
    assert_eq!(wizard.state(), WizardState::InfoEntered);
}

#[tokio::test]
async fn test_submit_info_patches_when_the_draft_has_an_id() {
    let server = MockServer::start().await;
    let client = organizer_client(&server).await;
    mock_create_event(&server, 55).await;

    Mock::given(method("PATCH"))
        .and(path("/api/marketplace/organizer/events/55/"))
        .and(body_partial_json(json!({"title": "Tournoi de padel de Tunis, edition 2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_record(55, "draft")))
        .expect(1)
        .mount(&server)
        .await;

    let wizard = client.wizard();
    wizard.submit_info(&valid_info()).await.unwrap();

    let mut edited = valid_info();
    edited.title = "Tournoi de padel de Tunis, edition 2".to_string();
    let draft = wizard.submit_info(&edited).await.unwrap();

    assert_eq!(draft.event_id, Some(55));
    assert_eq!(draft.info.title, "Tournoi de padel de Tunis, edition 2");
}

#[tokio::test]
async fn test_incomplete_info_is_rejected_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = SportsComp::new(&server.uri());
    let wizard = client.wizard();

    assert!(wizard.submit_info(&InfoDraft::default()).await.is_err());
    assert_eq!(wizard.state(), WizardState::Empty);
}

#[tokio::test]
async fn test_load_pricing_hydrates_only_unset_fields() {
    let server = MockServer::start().await;
    let client = organizer_client(&server).await;
    mock_create_event(&server, 55).await;

    Mock::given(method("GET"))
        .and(path("/api/marketplace/organizer/events/55/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_detail(55, "")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/marketplace/organizer/events/55/tickets/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            ticket(5, "Standard", "20.00", 30),
            ticket(6, "Ancien tarif", "10.00", 10)
        ])))
        .mount(&server)
        .await;

    let wizard = client.wizard();
    wizard.submit_info(&valid_info()).await.unwrap();

    let draft = wizard.load_pricing().await.unwrap();

    // capacity was blank locally, so the server value fills it in
    assert_eq!(draft.pricing.capacity_total, "64");
    assert!(!draft.pricing.is_free);
    assert_eq!(draft.pricing.currency, "TND");

    let ids: Vec<Option<i64>> = draft.pricing.tickets.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![Some(5), Some(6)]);
    assert_eq!(draft.pricing.tickets[0].quantity, "30");

    // a locally entered capacity wins over the server value on a later load
    let mut pricing = draft.pricing.clone();
    pricing.capacity_total = "80".to_string();
    wizard.save_pricing(&pricing).unwrap();

    let draft = wizard.load_pricing().await.unwrap();
    assert_eq!(draft.pricing.capacity_total, "80");
}

#[tokio::test]
async fn test_pricing_updates_creates_and_deletes_by_id() {
    let server = MockServer::start().await;
    let client = organizer_client(&server).await;
    mock_create_event(&server, 55).await;

    Mock::given(method("GET"))
        .and(path("/api/marketplace/organizer/events/55/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_detail(55, "")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/marketplace/organizer/events/55/tickets/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            ticket(5, "Standard", "20.00", 30),
            ticket(6, "Ancien tarif", "10.00", 10)
        ])))
        .mount(&server)
        .await;

    let wizard = client.wizard();
    wizard.submit_info(&valid_info()).await.unwrap();
    wizard.load_pricing().await.unwrap();

    Mock::given(method("PATCH"))
        .and(path("/api/marketplace/organizer/events/55/"))
        .and(body_partial_json(json!({
            "capacity_total": 80,
            "is_free": false,
            "currency": "TND",
            "status": "draft"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_record(55, "draft")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/marketplace/organizer/events/55/tickets/5/"))
        .and(body_json(json!({"name": "VIP", "price": 30.0, "quantity_total": 25})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(ticket(5, "Nom serveur", "30.00", 25)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/marketplace/organizer/events/55/tickets/"))
        .and(body_json(json!({"name": "Nouveau", "price": 15.0, "quantity_total": 40})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(ticket(100, "Nouveau (promo)", "15.00", 40)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/marketplace/organizer/events/55/tickets/6/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let pricing = PricingDraft {
        capacity_total: "80".to_string(),
        is_free: false,
        currency: "TND".to_string(),
        cancellation_policy: String::new(),
        cancellation_public: false,
        tickets: vec![
            TicketRow {
                id: Some(5),
                name: "VIP".to_string(),
                price: "30".to_string(),
                quantity: "25".to_string(),
            },
            TicketRow {
                id: None,
                name: "Nouveau".to_string(),
                price: "15".to_string(),
                quantity: "40".to_string(),
            },
        ],
    };
    let draft = wizard.submit_pricing(&pricing).await.unwrap();

    assert_eq!(wizard.state(), WizardState::Priced);
    let rows = &draft.pricing.tickets;
    assert_eq!(rows.len(), 2);

    // an updated row keeps its local name but takes the server price
    assert_eq!(rows[0].id, Some(5));
    assert_eq!(rows[0].name, "VIP");
    assert_eq!(rows[0].price, "30.00");

    // a created row takes everything from the server
    assert_eq!(rows[1].id, Some(100));
    assert_eq!(rows[1].name, "Nouveau (promo)");
}

#[tokio::test]
async fn test_free_event_with_blank_rows_submits_one_synthesized_ticket() {
    let server = MockServer::start().await;
    let client = organizer_client(&server).await;
    mock_create_event(&server, 55).await;

    Mock::given(method("PATCH"))
        .and(path("/api/marketplace/organizer/events/55/"))
        .and(body_partial_json(json!({"capacity_total": 40, "is_free": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_record(55, "draft")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/marketplace/organizer/events/55/tickets/"))
        .and(body_json(json!({
            "name": "Entree gratuite",
            "price": 0.0,
            "quantity_total": 40
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(ticket(77, "Entree gratuite", "0.00", 40)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let wizard = client.wizard();
    wizard.submit_info(&valid_info()).await.unwrap();

    let pricing = PricingDraft {
        capacity_total: "40".to_string(),
        is_free: true,
        currency: "TND".to_string(),
        cancellation_policy: String::new(),
        cancellation_public: false,
        tickets: vec![TicketRow::default()],
    };
    let draft = wizard.submit_pricing(&pricing).await.unwrap();

    assert_eq!(draft.pricing.tickets.len(), 1);
    assert_eq!(draft.pricing.tickets[0].id, Some(77));
    assert_eq!(draft.pricing.tickets[0].name, "Entree gratuite");
    assert_eq!(draft.pricing.tickets[0].quantity, "40");
}

#[tokio::test]
async fn test_missing_event_on_submit_invalidates_the_whole_draft() {
    let server = MockServer::start().await;
    let client = organizer_client(&server).await;
    mock_create_event(&server, 55).await;

    Mock::given(method("PATCH"))
        .and(path("/api/marketplace/organizer/events/55/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found."})))
        .mount(&server)
        .await;

    let wizard = client.wizard();
    wizard.submit_info(&valid_info()).await.unwrap();

    let err = wizard
        .submit_pricing(&PricingDraft::default())
        .await
        .unwrap_err();

    assert!(err.is_event_missing());
    // the stored draft is gone entirely, info fields included
    assert_eq!(wizard.draft(), EventDraft::default());
    assert_eq!(wizard.state(), WizardState::Empty);
}

#[tokio::test]
async fn test_missing_event_on_load_invalidates_the_whole_draft() {
    let server = MockServer::start().await;
    let client = organizer_client(&server).await;
    mock_create_event(&server, 55).await;

    Mock::given(method("GET"))
        .and(path("/api/marketplace/organizer/events/55/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found."})))
        .mount(&server)
        .await;

    let wizard = client.wizard();
    wizard.submit_info(&valid_info()).await.unwrap();

    let err = wizard.load_pricing().await.unwrap_err();

    assert!(err.is_event_missing());
    assert_eq!(wizard.draft(), EventDraft::default());
    assert_eq!(wizard.state(), WizardState::Empty);
}

#[tokio::test]
async fn test_load_media_prefers_the_local_cover() {
    let server = MockServer::start().await;
    let client = organizer_client(&server).await;
    mock_create_event(&server, 55).await;

    Mock::given(method("GET"))
        .and(path("/api/marketplace/organizer/events/55/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_detail(
            55,
            "https://cdn.sportscomp.tn/events/55/server-cover.jpg",
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/marketplace/organizer/events/55/media/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let wizard = client.wizard();
    wizard.submit_info(&valid_info()).await.unwrap();

    let draft = wizard.load_media().await.unwrap();
    assert_eq!(
        draft.media.cover_image_url,
        "https://cdn.sportscomp.tn/events/55/server-cover.jpg"
    );
    // an empty server list leaves the local rows alone
    assert_eq!(draft.media.items.len(), 3);

    let mut media = draft.media.clone();
    media.cover_image_url = "https://cdn.sportscomp.tn/events/55/local.jpg".to_string();
    wizard.save_media(&media).unwrap();

    let draft = wizard.load_media().await.unwrap();
    assert_eq!(
        draft.media.cover_image_url,
        "https://cdn.sportscomp.tn/events/55/local.jpg"
    );
}

#[tokio::test]
async fn test_submit_media_posts_the_filled_rows_in_order() {
    let server = MockServer::start().await;
    let client = organizer_client(&server).await;
    mock_create_event(&server, 55).await;

    Mock::given(method("PATCH"))
        .and(path("/api/marketplace/organizer/events/55/"))
        .and(body_partial_json(json!({
            "cover_image_url": "https://cdn.sportscomp.tn/events/55/cover.jpg",
            "status": "draft"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_record(55, "draft")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/marketplace/organizer/events/55/media/"))
        .and(body_json(json!({
            "media_type": "image",
            "url": "https://cdn.sportscomp.tn/events/55/1.jpg",
            "title": "Affiche",
            "is_cover": false,
            "sort_order": 0
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(media_item(
            31,
            "https://cdn.sportscomp.tn/events/55/1.jpg",
            0,
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/marketplace/organizer/events/55/media/"))
        .and(body_partial_json(json!({
            "url": "https://cdn.sportscomp.tn/events/55/2.jpg",
            "sort_order": 1
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(media_item(
            32,
            "https://cdn.sportscomp.tn/events/55/2.jpg",
            1,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let wizard = client.wizard();
    wizard.submit_info(&valid_info()).await.unwrap();

    let media = MediaDraft {
        cover_image_url: "https://cdn.sportscomp.tn/events/55/cover.jpg".to_string(),
        items: vec![
            MediaRow {
                id: None,
                url: "https://cdn.sportscomp.tn/events/55/1.jpg".to_string(),
                media_type: "image".to_string(),
                title: " Affiche ".to_string(),
            },
            MediaRow::default(),
            MediaRow {
                id: None,
                url: "https://cdn.sportscomp.tn/events/55/2.jpg".to_string(),
                media_type: "image".to_string(),
                title: String::new(),
            },
        ],
    };
    let draft = wizard.submit_media(&media).await.unwrap();

    assert_eq!(wizard.state(), WizardState::MediaAttached);
    // the blank middle row was dropped before submission
    assert_eq!(draft.media.items.len(), 2);
    assert_eq!(draft.media.items[0].id, Some(31));
    assert_eq!(draft.media.items[1].id, Some(32));
}

#[tokio::test]
async fn test_review_then_publish_clears_the_draft() {
    let server = MockServer::start().await;
    let client = organizer_client(&server).await;
    mock_create_event(&server, 55).await;

    Mock::given(method("GET"))
        .and(path("/api/marketplace/organizer/events/55/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_detail(55, "")))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/marketplace/organizer/events/55/"))
        .and(body_json(json!({"status": "pending"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_record(55, "pending")))
        .expect(1)
        .mount(&server)
        .await;

    let wizard = client.wizard();
    wizard.submit_info(&valid_info()).await.unwrap();

    let detail = wizard.review().await.unwrap();
    assert_eq!(detail.id, 55);
    assert_eq!(wizard.state(), WizardState::Reviewed);

    wizard.publish().await.unwrap();

    assert_eq!(wizard.state(), WizardState::Published);
    assert_eq!(wizard.draft(), EventDraft::default());
}

#[tokio::test]
async fn test_load_steps_without_an_event_are_no_ops() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = SportsComp::new(&server.uri());
    let wizard = client.wizard();

    let draft = wizard.load_pricing().await.unwrap();
    assert_eq!(draft.event_id, None);

    let draft = wizard.load_media().await.unwrap();
    assert_eq!(draft.event_id, None);
}

#[tokio::test]
async fn test_pricing_needs_a_created_event() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = SportsComp::new(&server.uri());
    let err = client
        .wizard()
        .submit_pricing(&PricingDraft::default())
        .await
        .unwrap_err();

    assert!(!err.is_event_missing());
}

#[tokio::test]
async fn test_discard_resets_the_draft() {
    let client = SportsComp::new("http://localhost:1");
    let wizard = client.wizard();

    let mut info = valid_info();
    info.title = "Brouillon abandonne".to_string();
    wizard.save_info(&info).unwrap();
    assert_eq!(wizard.draft().info.title, "Brouillon abandonne");

    wizard.discard().unwrap();

    assert_eq!(wizard.draft(), EventDraft::default());
    assert_eq!(wizard.state(), WizardState::Empty);
}
