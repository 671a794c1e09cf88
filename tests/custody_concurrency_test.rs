mod common;

use common::TestApp;
use custodia_api::{
    commands::custody::{
        CreateTransferCommand, OpenShiftCommand, ReceiveTransferCommand, RecordCountCommand,
    },
    models::{RegisterKind, TransferStatus},
};
use rust_decimal_macros::dec;
use uuid::Uuid;

#[tokio::test]
async fn concurrent_opens_for_the_same_pair_yield_one_shift() {
    let app = TestApp::new().await;
    let commercial = app.seed_register("Caja C1", RegisterKind::Commercial).await;
    let user = Uuid::new_v4();

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let custody = app.state.custody.clone();
        tasks.push(tokio::spawn(async move {
            custody
                .open_shift(OpenShiftCommand {
                    register_id: commercial,
                    user_id: user,
                    employee_id: None,
                    initial_amount: dec!(100.00),
                    date: None,
                    start_time: None,
                    notes: None,
                })
                .await
                .is_ok()
        }));
    }

    let mut successes = 0;
    for task in tasks {
        if task.await.expect("task panicked") {
            successes += 1;
        }
    }
    assert_eq!(successes, 1, "exactly one open shift per (register, user)");

    let active = app
        .state
        .custody
        .active_opening(commercial, user)
        .await
        .unwrap();
    assert!(active.is_some());
}

#[tokio::test]
async fn concurrent_receptions_settle_a_transfer_once() {
    let app = TestApp::new().await;
    let commercial = app.seed_register("Caja C2", RegisterKind::Commercial).await;
    let principal = app.seed_register("Principal", RegisterKind::Principal).await;
    let user = Uuid::new_v4();

    let opened = app
        .state
        .custody
        .open_shift(OpenShiftCommand {
            register_id: commercial,
            user_id: user,
            employee_id: None,
            initial_amount: dec!(100.00),
            date: None,
            start_time: None,
            notes: None,
        })
        .await
        .unwrap();
    let counted = app
        .state
        .custody
        .record_count(RecordCountCommand {
            opening_id: opened.opening_id,
            counted_amount: dec!(300.00),
            final_amount: dec!(300.00),
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

    let mut tasks = Vec::new();
    for _ in 0..6 {
        let custody = app.state.custody.clone();
        let transfer_id = sent.transfer_id;
        tasks.push(tokio::spawn(async move {
            custody
                .receive_transfer(ReceiveTransferCommand {
                    transfer_id,
                    receiving_user_id: Uuid::new_v4(),
                    received_amount: dec!(300.00),
                    comment: None,
                })
                .await
        }));
    }

    let mut successes = Vec::new();
    for task in tasks {
        if let Ok(result) = task.await.expect("task panicked") {
            successes.push(result);
        }
    }
    assert_eq!(successes.len(), 1, "a transfer settles exactly once");
    assert_eq!(successes[0].status, TransferStatus::Received);

    assert!(app.state.custody.pending_transfers().await.unwrap().is_empty());
}
