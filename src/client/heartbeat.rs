/// Keep-alive for a registered session.
///
/// The heartbeat runs as an interval future on the session actor's own
/// context, so it writes through the same sink as every other message and
/// dies with the actor. It is also cancelled explicitly when the session ends.

use std::time::Duration;

use actix::prelude::*;
use log::debug;
use uuid::Uuid;

use crate::client::messages::OutgoingMessage;

/// Actors that own a connection and a [`Heartbeat`].
pub trait KeepAlive: Actor<Context = Context<Self>> {
    fn heartbeat(&mut self) -> &mut Heartbeat;

    /// Writes one keep-alive message on the connection.
    fn send_keep_alive(&mut self, message: OutgoingMessage, ctx: &mut Context<Self>);
}

pub struct Heartbeat {
    interval: Duration,
    handle: Option<SpawnHandle>,
    sent: u64,
}

impl Heartbeat {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            handle: None,
            sent: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Number of heartbeat requests sent so far.
    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Sends a first heartbeat right away, then one per interval. No-op if already running.
    pub fn start<A: KeepAlive>(act: &mut A, ctx: &mut Context<A>, receiving_player_id: Option<Uuid>) {
        if act.heartbeat().is_running() {
            return;
        }
        let interval = act.heartbeat().interval;
        debug!("[Heartbeat] Starting, interval={:?}", interval);

        let handle = ctx.run_interval(interval, move |act, ctx| {
            Self::beat(act, ctx, receiving_player_id);
        });
        act.heartbeat().handle = Some(handle);
        Self::beat(act, ctx, receiving_player_id);
    }

    /// Cancels the interval. Safe to call when not running.
    pub fn stop<A: KeepAlive>(act: &mut A, ctx: &mut Context<A>) {
        if let Some(handle) = act.heartbeat().handle.take() {
            ctx.cancel_future(handle);
            debug!("[Heartbeat] Stopped after {} requests", act.heartbeat().sent);
        }
    }

    fn beat<A: KeepAlive>(act: &mut A, ctx: &mut Context<A>, receiving_player_id: Option<Uuid>) {
        debug!("[Heartbeat] Sending heartbeat");
        act.heartbeat().sent += 1;
        act.send_keep_alive(OutgoingMessage::heart_beat_request(receiving_player_id), ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records keep-alives instead of writing them.
    struct Recorder {
        heartbeat: Heartbeat,
        received: Vec<OutgoingMessage>,
    }

    impl Actor for Recorder {
        type Context = Context<Self>;
    }

    impl KeepAlive for Recorder {
        fn heartbeat(&mut self) -> &mut Heartbeat {
            &mut self.heartbeat
        }

        fn send_keep_alive(&mut self, message: OutgoingMessage, _ctx: &mut Context<Self>) {
            self.received.push(message);
        }
    }

    #[derive(Message)]
    #[rtype(result = "()")]
    struct Start(Option<Uuid>);

    #[derive(Message)]
    #[rtype(result = "()")]
    struct Stop;

    #[derive(Message)]
    #[rtype(result = "(usize, u64, bool)")]
    struct Report;

    impl Handler<Start> for Recorder {
        type Result = ();
        fn handle(&mut self, msg: Start, ctx: &mut Self::Context) {
            Heartbeat::start(self, ctx, msg.0);
        }
    }

    impl Handler<Stop> for Recorder {
        type Result = ();
        fn handle(&mut self, _: Stop, ctx: &mut Self::Context) {
            Heartbeat::stop(self, ctx);
        }
    }

    impl Handler<Report> for Recorder {
        type Result = MessageResult<Report>;
        fn handle(&mut self, _: Report, _: &mut Self::Context) -> Self::Result {
            MessageResult((self.received.len(), self.heartbeat.sent(), self.heartbeat.is_running()))
        }
    }

    #[actix::test]
    async fn test_heartbeat_runs_until_stopped() {
        let player = Uuid::new_v4();
        let addr = Recorder {
            heartbeat: Heartbeat::new(Duration::from_millis(20)),
            received: Vec::new(),
        }
        .start();

        addr.send(Start(Some(player))).await.unwrap();
        // Second start is ignored.
        addr.send(Start(Some(player))).await.unwrap();
        let (received, sent, running) = addr.send(Report).await.unwrap();
        assert_eq!((received, sent, running), (1, 1, true));

        actix::clock::sleep(Duration::from_millis(110)).await;
        addr.send(Stop).await.unwrap();
        let (received, _, running) = addr.send(Report).await.unwrap();
        assert!(received >= 3, "only {received} heartbeats");
        assert!(!running);

        actix::clock::sleep(Duration::from_millis(60)).await;
        let (after, _, _) = addr.send(Report).await.unwrap();
        assert_eq!(after, received);
    }
}
