mod common;

use common::TestApp;
use custodia_api::{
    commands::custody::{
        CreateTransferCommand, OpenShiftCommand, ReceiveTransferCommand, RecordCountCommand,
        VendorPaymentInput,
    },
    errors::ServiceError,
    models::{DocumentKind, RegisterKind, TransferStatus},
};
use rust_decimal_macros::dec;
use uuid::Uuid;

fn open_cmd(register_id: Uuid, user_id: Uuid) -> OpenShiftCommand {
    OpenShiftCommand {
        register_id,
        user_id,
        employee_id: None,
        initial_amount: dec!(100.00),
        date: None,
        start_time: None,
        notes: None,
    }
}

fn payment(value: rust_decimal::Decimal, balance_due: rust_decimal::Decimal) -> VendorPaymentInput {
    VendorPaymentInput {
        vendor: "Proveedor Uno".to_string(),
        document_kind: DocumentKind::Invoice,
        document_number: Some("F-001".to_string()),
        value,
        balance_due,
        paid_by: "Cajera".to_string(),
    }
}

#[tokio::test]
async fn full_cycle_exact_reception_ends_received() {
    let app = TestApp::new().await;
    let commercial = app.seed_register("Caja 1", RegisterKind::Commercial).await;
    let principal = app.seed_register("Principal", RegisterKind::Principal).await;
    let user = Uuid::new_v4();
    let employee = Uuid::new_v4();

    let opened = app
        .state
        .custody
        .open_shift(OpenShiftCommand {
            employee_id: Some(employee),
            ..open_cmd(commercial, user)
        })
        .await
        .expect("open");

    let active = app
        .state
        .custody
        .active_opening(commercial, user)
        .await
        .expect("query")
        .expect("active opening present");
    assert_eq!(active.opening_id, opened.opening_id);
    assert_eq!(active.initial_amount, dec!(100.00));

    let counted = app
        .state
        .custody
        .record_count(RecordCountCommand {
            opening_id: opened.opening_id,
            counted_amount: dec!(250.00),
            final_amount: dec!(230.00),
            comment: None,
            vendor_payments: vec![payment(dec!(20.00), dec!(20.00))],
        })
        .await
        .expect("count");
    assert_eq!(counted.expected_amount, dec!(100.00));
    assert_eq!(counted.difference, dec!(0.00));
    assert_eq!(counted.final_amount, dec!(230.00));

    // The shift is closed now, so the pair has no active opening.
    assert!(app
        .state
        .custody
        .active_opening(commercial, user)
        .await
        .unwrap()
        .is_none());

    let untransferred = app
        .state
        .custody
        .latest_untransferred_count()
        .await
        .unwrap()
        .expect("count awaiting transfer");
    assert_eq!(untransferred.count_id, counted.count_id);
    assert_eq!(untransferred.register_id, commercial);
    assert_eq!(untransferred.employee_id, Some(employee));

    let sent = app
        .state
        .custody
        .create_transfer(CreateTransferCommand {
            count_id: counted.count_id,
            destination_register_id: principal,
        })
        .await
        .expect("transfer");
    assert_eq!(sent.amount, dec!(250.00));
    assert_eq!(sent.status, TransferStatus::InTransit);
    assert_eq!(sent.source_register_id, commercial);

    // Sent counts no longer show up as untransferred.
    assert!(app
        .state
        .custody
        .latest_untransferred_count()
        .await
        .unwrap()
        .is_none());

    let pending = app.state.custody.pending_transfers().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].transfer_id, sent.transfer_id);
    assert_eq!(pending[0].source_register_name, "Caja 1");
    assert_eq!(pending[0].sending_user_id, user);
    assert_eq!(pending[0].employee_id, Some(employee));
    assert!(!pending[0].needs_attention);

    let received = app
        .state
        .custody
        .receive_transfer(ReceiveTransferCommand {
            transfer_id: sent.transfer_id,
            receiving_user_id: Uuid::new_v4(),
            received_amount: dec!(250.00),
            comment: None,
        })
        .await
        .expect("reception");
    assert_eq!(received.status, TransferStatus::Received);
    assert_eq!(received.difference, dec!(0.00));

    assert!(app.state.custody.pending_transfers().await.unwrap().is_empty());
}

#[tokio::test]
async fn mismatched_reception_requires_comment_and_ends_observed() {
    let app = TestApp::new().await;
    let commercial = app.seed_register("Caja 2", RegisterKind::Commercial).await;
    let principal = app.seed_register("Principal", RegisterKind::Principal).await;
    let user = Uuid::new_v4();

    let opened = app
        .state
        .custody
        .open_shift(open_cmd(commercial, user))
        .await
        .unwrap();
    let counted = app
        .state
        .custody
        .record_count(RecordCountCommand {
            opening_id: opened.opening_id,
            counted_amount: dec!(180.00),
            final_amount: dec!(180.00),
            comment: None,
            vendor_payments: vec![],
        })
        .await
        .unwrap();
    let sent = app
        .state
        .custody
        .create_transfer(CreateTransferCommand {
            count_id: counted.count_id,
            destination_register_id: principal,
        })
        .await
        .unwrap();

    // Mismatch without a comment is rejected before anything changes.
    let bare = app
        .state
        .custody
        .receive_transfer(ReceiveTransferCommand {
            transfer_id: sent.transfer_id,
            receiving_user_id: Uuid::new_v4(),
            received_amount: dec!(179.00),
            comment: None,
        })
        .await;
    assert!(matches!(bare, Err(ServiceError::ValidationError(_))));
    assert_eq!(app.state.custody.pending_transfers().await.unwrap().len(), 1);

    let observed = app
        .state
        .custody
        .receive_transfer(ReceiveTransferCommand {
            transfer_id: sent.transfer_id,
            receiving_user_id: Uuid::new_v4(),
            received_amount: dec!(179.00),
            comment: Some("Faltó un billete de 1".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(observed.status, TransferStatus::Observed);
    assert_eq!(observed.difference, dec!(-1.00));

    // Terminal: a second reception is rejected either way.
    let again = app
        .state
        .custody
        .receive_transfer(ReceiveTransferCommand {
            transfer_id: sent.transfer_id,
            receiving_user_id: Uuid::new_v4(),
            received_amount: dec!(180.00),
            comment: None,
        })
        .await;
    assert!(matches!(again, Err(ServiceError::InvalidState(_))));
}

#[tokio::test]
async fn duplicate_open_shift_conflicts_until_count_closes_it() {
    let app = TestApp::new().await;
    let commercial = app.seed_register("Caja 3", RegisterKind::Commercial).await;
    let user = Uuid::new_v4();

    let opened = app
        .state
        .custody
        .open_shift(open_cmd(commercial, user))
        .await
        .unwrap();

    let duplicate = app.state.custody.open_shift(open_cmd(commercial, user)).await;
    assert!(matches!(duplicate, Err(ServiceError::Conflict(_))));

    // A different user on the same register is fine.
    app.state
        .custody
        .open_shift(open_cmd(commercial, Uuid::new_v4()))
        .await
        .expect("other user opens");

    // Closing via count frees the pair for a new cycle.
    app.state
        .custody
        .record_count(RecordCountCommand {
            opening_id: opened.opening_id,
            counted_amount: dec!(100.00),
            final_amount: dec!(100.00),
            comment: None,
            vendor_payments: vec![],
        })
        .await
        .unwrap();
    app.state
        .custody
        .open_shift(open_cmd(commercial, user))
        .await
        .expect("reopen after close");
}

#[tokio::test]
async fn count_threshold_gate_is_strict_and_closing_is_final() {
    let app = TestApp::new().await;
    let commercial = app.seed_register("Caja 4", RegisterKind::Commercial).await;
    let user = Uuid::new_v4();

    let opened = app
        .state
        .custody
        .open_shift(open_cmd(commercial, user))
        .await
        .unwrap();

    // Balance due exceeds values by 2.01: above the 2.00 threshold, comment
    // required.
    let rejected = app
        .state
        .custody
        .record_count(RecordCountCommand {
            opening_id: opened.opening_id,
            counted_amount: dec!(500.00),
            final_amount: dec!(400.00),
            comment: None,
            vendor_payments: vec![payment(dec!(97.995), dec!(100.00))],
        })
        .await;
    assert!(matches!(rejected, Err(ServiceError::ValidationError(_))));

    // Exactly at the threshold passes without a comment.
    let at_threshold = app
        .state
        .custody
        .record_count(RecordCountCommand {
            opening_id: opened.opening_id,
            counted_amount: dec!(500.00),
            final_amount: dec!(400.00),
            comment: None,
            vendor_payments: vec![payment(dec!(98.00), dec!(100.00))],
        })
        .await
        .expect("threshold boundary passes");
    assert_eq!(at_threshold.difference, dec!(2.00));

    // The opening is closed now; counting again is a state error.
    let again = app
        .state
        .custody
        .record_count(RecordCountCommand {
            opening_id: opened.opening_id,
            counted_amount: dec!(500.00),
            final_amount: dec!(500.00),
            comment: None,
            vendor_payments: vec![],
        })
        .await;
    assert!(matches!(again, Err(ServiceError::InvalidState(_))));
}

#[tokio::test]
async fn duplicate_transfer_for_a_count_conflicts() {
    let app = TestApp::new().await;
    let commercial = app.seed_register("Caja 5", RegisterKind::Commercial).await;
    let principal = app.seed_register("Principal", RegisterKind::Principal).await;
    let user = Uuid::new_v4();

    let opened = app
        .state
        .custody
        .open_shift(open_cmd(commercial, user))
        .await
        .unwrap();
    let counted = app
        .state
        .custody
        .record_count(RecordCountCommand {
            opening_id: opened.opening_id,
            counted_amount: dec!(321.00),
            final_amount: dec!(321.00),
            comment: None,
            vendor_payments: vec![],
        })
        .await
        .unwrap();

    app.state
        .custody
        .create_transfer(CreateTransferCommand {
            count_id: counted.count_id,
            destination_register_id: principal,
        })
        .await
        .unwrap();

    let duplicate = app
        .state
        .custody
        .create_transfer(CreateTransferCommand {
            count_id: counted.count_id,
            destination_register_id: principal,
        })
        .await;
    assert!(matches!(duplicate, Err(ServiceError::Conflict(_))));

    // Destination must be a principal register.
    let wrong_destination = app
        .state
        .custody
        .create_transfer(CreateTransferCommand {
            count_id: counted.count_id,
            destination_register_id: commercial,
        })
        .await;
    assert!(matches!(
        wrong_destination,
        Err(ServiceError::ValidationError(_)) | Err(ServiceError::Conflict(_))
    ));
}

#[tokio::test]
async fn auto_numbered_documents_come_from_the_server_sequence() {
    let app = TestApp::new().await;
    let commercial = app.seed_register("Caja 6", RegisterKind::Commercial).await;
    let user = Uuid::new_v4();

    let opened = app
        .state
        .custody
        .open_shift(open_cmd(commercial, user))
        .await
        .unwrap();

    let counted = app
        .state
        .custody
        .record_count(RecordCountCommand {
            opening_id: opened.opening_id,
            counted_amount: dec!(400.00),
            final_amount: dec!(378.00),
            comment: None,
            vendor_payments: vec![
                VendorPaymentInput {
                    vendor: "Proveedor A".to_string(),
                    document_kind: DocumentKind::UnauthorizedDoc,
                    document_number: None,
                    value: dec!(10.00),
                    balance_due: dec!(10.00),
                    paid_by: "Cajera".to_string(),
                },
                VendorPaymentInput {
                    vendor: "Proveedor B".to_string(),
                    document_kind: DocumentKind::UnauthorizedDoc,
                    document_number: None,
                    value: dec!(5.00),
                    balance_due: dec!(5.00),
                    paid_by: "Cajera".to_string(),
                },
                VendorPaymentInput {
                    vendor: "Proveedor C".to_string(),
                    document_kind: DocumentKind::Return,
                    document_number: None,
                    value: dec!(7.00),
                    balance_due: dec!(7.00),
                    paid_by: "Cajera".to_string(),
                },
            ],
        })
        .await
        .expect("count with auto-numbered documents");

    assert_eq!(
        counted.document_numbers,
        vec!["DNA-0001", "DNA-0002", "DEV-0001"]
    );
}

#[tokio::test]
async fn validation_rejects_bad_amounts_and_unknown_targets() {
    let app = TestApp::new().await;
    let commercial = app.seed_register("Caja 7", RegisterKind::Commercial).await;
    let user = Uuid::new_v4();

    let negative = app
        .state
        .custody
        .open_shift(OpenShiftCommand {
            register_id: commercial,
            user_id: user,
            employee_id: None,
            initial_amount: dec!(-1.00),
            date: None,
            start_time: None,
            notes: None,
        })
        .await;
    assert!(matches!(negative, Err(ServiceError::ValidationError(_))));

    let unknown_register = app
        .state
        .custody
        .open_shift(open_cmd(Uuid::new_v4(), user))
        .await;
    assert!(matches!(unknown_register, Err(ServiceError::NotFound(_))));

    let unknown_opening = app
        .state
        .custody
        .record_count(RecordCountCommand {
            opening_id: Uuid::new_v4(),
            counted_amount: dec!(10.00),
            final_amount: dec!(10.00),
            comment: None,
            vendor_payments: vec![],
        })
        .await;
    assert!(matches!(unknown_opening, Err(ServiceError::NotFound(_))));

    let opened = app
        .state
        .custody
        .open_shift(open_cmd(commercial, user))
        .await
        .unwrap();

    // A payment whose balance due exceeds the reported final amount is refused.
    let overdrawn = app
        .state
        .custody
        .record_count(RecordCountCommand {
            opening_id: opened.opening_id,
            counted_amount: dec!(50.00),
            final_amount: dec!(40.00),
            comment: Some("intento inválido".to_string()),
            vendor_payments: vec![payment(dec!(10.00), dec!(45.00))],
        })
        .await;
    assert!(matches!(overdrawn, Err(ServiceError::ValidationError(_))));
}
