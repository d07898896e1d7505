use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use lotto_session::countdown::time_remaining;
use lotto_session::draws::next_draw;
use lotto_session::effects::{EffectMode, WinnerDetector};
use lotto_session::error::ServiceError;
use lotto_session::model::{
    Draw, FlexNumber, JackpotStatus, Order, OrderStatus, SelectionPair, Selections,
    SubmitOrderPayload, SubmitReceipt, SuperballWinner, SuperballWinnerRecord, Ticket, Win,
    WinningNumber,
};
use lotto_session::payment::PaymentSession;
use lotto_session::reconcile::{lottery, superball};
use lotto_session::services::{
    Cart, DrawService, Notifier, OrderService, RewardsService, ServiceResult, SuperballService,
};
use lotto_session::store::ClientStore;
use std::env;

/// In-memory fixtures standing in for the external services, so the whole
/// pipeline can be exercised end to end without a network.
struct FixtureBackend {
    draws: Vec<Draw>,
    orders: Vec<Order>,
    wins: Vec<Win>,
    winners: Vec<SuperballWinnerRecord>,
}

#[async_trait]
impl DrawService for FixtureBackend {
    async fn list_upcoming_draws(&self) -> ServiceResult<Vec<Draw>> {
        Ok(self.draws.clone())
    }
}

#[async_trait]
impl OrderService for FixtureBackend {
    async fn list_my_paid_orders(&self) -> ServiceResult<Vec<Order>> {
        Ok(self.orders.clone())
    }

    async fn submit_order(&self, payload: SubmitOrderPayload) -> ServiceResult<SubmitReceipt> {
        if payload.tickets.is_empty() {
            return Err(ServiceError::BadResponse("empty ticket list".to_string()));
        }
        Ok(SubmitReceipt {
            order_id: Some("order-demo".to_string()),
        })
    }
}

#[async_trait]
impl RewardsService for FixtureBackend {
    async fn get_my_wins(&self, _token: &str) -> ServiceResult<Vec<Win>> {
        Ok(self.wins.clone())
    }
}

#[async_trait]
impl SuperballService for FixtureBackend {
    async fn get_my_entries(&self, _token: &str) -> ServiceResult<Vec<Ticket>> {
        Ok(self
            .orders
            .iter()
            .flat_map(|o| o.tickets.clone())
            .collect())
    }

    async fn get_winners(&self) -> ServiceResult<Vec<SuperballWinnerRecord>> {
        Ok(self.winners.clone())
    }

    async fn jackpot_status(&self) -> ServiceResult<JackpotStatus> {
        Ok(JackpotStatus {
            active: true,
            amount: 12_500.0,
            current_streak: 3,
        })
    }
}

struct NoopCart;
impl Cart for NoopCart {
    fn clear(&self) {
        println!("   🛒 Cart cleared");
    }
}

struct StdoutNotifier;
impl Notifier for StdoutNotifier {
    fn success(&self, message: &str) {
        println!("   ✅ {}", message);
    }
    fn error(&self, message: &str) {
        eprintln!("   ❌ {}", message);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let now = Utc::now();
    let draw_date = now + Duration::hours(6);
    let backend = FixtureBackend {
        draws: vec![
            Draw {
                id: "draw-de".to_string(),
                country: "DE".to_string(),
                draw_date: now + Duration::hours(30),
                display_name: Some("Germany".to_string()),
            },
            Draw {
                id: "draw-it".to_string(),
                country: "IT".to_string(),
                draw_date,
                display_name: Some("Italy".to_string()),
            },
        ],
        orders: vec![Order {
            id: "order-1".to_string(),
            payment_status: OrderStatus::Paid,
            draw_date,
            tickets: vec![Ticket {
                id: Some("ticket-1".to_string()),
                price: Some(5.0),
                selections: Some(Selections::Pairs(vec![SelectionPair {
                    country: "IT".to_string(),
                    number: FlexNumber::Int(42),
                }])),
                draw_date: None,
            }],
        }],
        wins: vec![Win {
            id: None,
            ticket_id: Some("ticket-1".to_string()),
            selections: None,
            prize: Some(150.0),
            prize_amount: None,
            draw_date,
        }],
        winners: vec![SuperballWinnerRecord {
            winner_number: FlexNumber::Int(7),
            winners: vec![SuperballWinner {
                email: "a@x.com".to_string(),
                prize: 50.0,
            }],
            draw_date: Some(draw_date),
        }],
    };

    // 1. Select the soonest future draw and show its countdown.
    let draws = backend.list_upcoming_draws().await?;
    let next = next_draw(&draws, now);
    println!("🎱 Upcoming draws: {}", draws.len());
    match next {
        Some(draw) => {
            let remaining = time_remaining(Some(draw.draw_date), now);
            println!(
                "   Next draw: {} in {}d {:02}h {:02}m {:02}s",
                draw.id, remaining.days, remaining.hours, remaining.minutes, remaining.seconds
            );
        }
        None => println!("   No future draw scheduled"),
    }

    // 2. Reconcile paid tickets against the attested wins.
    let orders = backend.list_my_paid_orders().await?;
    let tickets = lottery::tickets_for_draw(&orders, draw_date);
    let wins = lottery::wins_for_draw(&backend.wins, draw_date);
    let result = lottery::reconcile_tickets(&tickets, &wins);
    println!("\n🎟️  Lottery reconciliation:");
    for (key, prize) in &result.prizes {
        println!("   {} -> {:.2}", key, prize);
    }
    println!("   Total: {:.2}", result.total);

    let winning = vec![WinningNumber {
        country: "IT".to_string(),
        number: FlexNumber::Int(42),
        draw_date,
    }];
    let hit = lottery::any_number_hit(&orders, &winning, draw_date);
    let mut detector = WinnerDetector::new();
    match detector.maybe_trigger(EffectMode::Lottery, hit, &result.prizes) {
        Some(trigger) => println!("   🎉 Effect fired with {} pieces", trigger.params.pieces.len()),
        None => println!("   No effect this round"),
    }

    // 3. Superball: latest winning number, match state, historical prizes.
    let winners = backend.get_winners().await?;
    let entries = vec![Ticket {
        id: None,
        price: None,
        selections: Some(Selections::Numbers(vec![
            FlexNumber::Int(3),
            FlexNumber::Int(7),
            FlexNumber::Int(9),
        ])),
        draw_date: Some(draw_date),
    }];
    let winning_number = superball::latest_winning_number(&winners);
    let matched = superball::any_ticket_matches(&entries, winning_number);
    let status = superball::SuperballStatus::derive(winning_number, matched);
    println!("\n🔮 Superball status: {:?}", status);
    println!(
        "   Prize for a@x.com: {:.2}",
        superball::total_prize(&winners, "a@x.com")
    );

    // 4. Run a full payment session against the fixture order service.
    let store = ClientStore::new(
        env::var("CLIENT_STATE_PATH").unwrap_or_else(|_| "./client-state.json".to_string()),
    );
    if !store.load().payment_guide_seen {
        println!("\n💡 Showing one-time payment guide");
        store.mark_guide_seen()?;
    }

    let mut session = PaymentSession::new();
    session.select_provider("btc", now);
    println!("\n💳 Provider selected, deadline: {:?}", session.deadline());
    println!("   Address: {}", session.payment_address().unwrap_or_default());
    session.set_transaction_id("abc123");

    let cart_tickets: Vec<Ticket> = orders.iter().flat_map(|o| o.tickets.clone()).collect();
    match session
        .submit(cart_tickets, 5.0, &backend, &NoopCart, &StdoutNotifier)
        .await
    {
        Ok(()) => println!("   Submit accepted, guard raised: {}", session.suppress_empty_cart_redirect()),
        Err(e) => eprintln!("   Submit rejected: {}", e),
    }

    Ok(())
}
