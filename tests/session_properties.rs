mod common;

use common::*;
use deck_draw::cards::{Card, DealtCard, Rank, Suit};
use deck_draw::error::SessionError;
use proptest::prelude::*;

fn any_rank() -> impl Strategy<Value = Rank> {
    (0usize..13).prop_map(|i| Rank::ALL[i])
}

fn any_suit() -> impl Strategy<Value = Suit> {
    prop_oneof![Just(Suit::Clubs), Just(Suit::Diamonds), Just(Suit::Hearts), Just(Suit::Spades),]
}

fn any_dealt() -> impl Strategy<Value = DealtCard> {
    (any_rank(), any_suit()).prop_map(|(r, s)| card(r, s))
}

/// One dealer reply to a draw: the cards handed out and the count it reports.
fn any_draw() -> impl Strategy<Value = (Vec<DealtCard>, u32)> {
    (prop::collection::vec(any_dealt(), 0..=3), 1u32..500)
}

#[derive(Debug, Clone)]
enum Step {
    Draw(Vec<DealtCard>, u32),
    Shuffle(bool, u32),
}

fn any_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => any_draw().prop_map(|(cards, n)| Step::Draw(cards, n)),
        1 => (any::<bool>(), 1u32..500).prop_map(|(ok, n)| Step::Shuffle(ok, n)),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn drawn_cards_are_the_replies_in_order(draws in prop::collection::vec(any_draw(), 1..12)) {
        let rt = runtime();
        let (drawn, remaining, expected) = rt.block_on(async {
            let mut script = vec![new_deck("p", 52)];
            script.extend(draws.iter().map(|(cards, n)| draw("p", *n, cards.clone())));
            let session = session_with(ScriptedDealer::new(script));
            session.start_new_deck().unwrap().await.unwrap();
            let mut expected: Vec<DealtCard> = Vec::new();
            for (cards, _) in &draws {
                let got = session.draw_one().unwrap().await.unwrap();
                assert_eq!(&got, cards);
                expected.extend(cards.iter().cloned());
            }
            let snap = session.snapshot();
            (snap.drawn().to_vec(), snap.remaining(), expected)
        });
        prop_assert_eq!(drawn, expected);
        prop_assert_eq!(remaining, draws.last().map(|(_, n)| *n));
    }

    #[test]
    fn state_tracks_a_simple_model(steps in prop::collection::vec(any_step(), 1..16)) {
        let rt = runtime();
        rt.block_on(async {
            let mut script = vec![new_deck("m", 52)];
            script.extend(steps.iter().map(|step| match step {
                Step::Draw(cards, n) => draw("m", *n, cards.clone()),
                Step::Shuffle(ok, n) => shuffle("m", *ok, *n),
            }));
            let session = session_with(ScriptedDealer::new(script));
            session.start_new_deck().unwrap().await.unwrap();

            let mut model_drawn: Vec<Card> = Vec::new();
            let mut model_remaining = 52u32;
            for step in &steps {
                match step {
                    Step::Draw(cards, n) => {
                        session.draw_one().unwrap().await.unwrap();
                        model_drawn.extend(cards.iter().map(|c| c.card));
                        model_remaining = *n;
                    }
                    Step::Shuffle(true, n) => {
                        session.reshuffle().unwrap().await.unwrap();
                        model_drawn.clear();
                        model_remaining = *n;
                    }
                    Step::Shuffle(false, _) => {
                        let err = session.reshuffle().unwrap().await.unwrap_err();
                        assert!(matches!(err, SessionError::ShuffleRejected));
                    }
                }
                let snap = session.snapshot();
                let seen: Vec<Card> = snap.drawn().iter().map(|c| c.card).collect();
                assert_eq!(seen, model_drawn);
                assert_eq!(snap.remaining(), Some(model_remaining));
            }
        });
    }
}
