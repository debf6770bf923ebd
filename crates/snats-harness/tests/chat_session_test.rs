//! End-to-end chat sessions over the in-memory bus.
//!
//! Each test runs complete sessions (connect, announce, chat, leave) through
//! `Runtime` and checks what every participant rendered and what reached the
//! bus.

use std::time::Duration;

use bytes::Bytes;
use snats_core::{
    ChatSession, Runtime, SessionConfig, SessionError, SessionPhase, ShutdownTrigger, Transport,
    TransportError, shutdown_channel,
};
use snats_crypto::Passphrase;
use snats_harness::{CapturedOutput, MemoryBus, ScriptedInput, SeededEnv};
use snats_proto::{DisplayName, Envelope, ProtocolVersion, Topic};
use tokio::task::JoinHandle;

const WAIT: Duration = Duration::from_secs(5);
const PLACEHOLDER: &str = "<unable to decrypt, wrong key?>";

type ChatRuntime = Runtime<SeededEnv, snats_harness::MemoryTransport, CapturedOutput>;
type Finished = (ChatRuntime, Result<(), SessionError>);

struct Participant {
    output: CapturedOutput,
    shutdown: ShutdownTrigger,
    handle: JoinHandle<Finished>,
}

impl Participant {
    async fn join(
        bus: &MemoryBus,
        name: &str,
        passphrase: &str,
        protocol: ProtocolVersion,
        input: ScriptedInput,
    ) -> Self {
        let output = CapturedOutput::new();
        let mut runtime = connect(bus, name, passphrase, protocol, output.clone()).await;
        assert_eq!(runtime.phase(), SessionPhase::Announcing);

        let (trigger, shutdown) = shutdown_channel();
        let handle = tokio::spawn(async move {
            let result = runtime.run(input, shutdown).await;
            (runtime, result)
        });

        Self { output, shutdown: trigger, handle }
    }

    /// Interrupt the session and wait for it to end.
    async fn finish(self) -> Finished {
        self.shutdown.trigger();
        self.handle.await.expect("session task")
    }

    /// Wait for the session to end on its own.
    async fn done(self) -> Finished {
        self.handle.await.expect("session task")
    }
}

async fn connect(
    bus: &MemoryBus,
    name: &str,
    passphrase: &str,
    protocol: ProtocolVersion,
    output: CapturedOutput,
) -> ChatRuntime {
    let config = SessionConfig::new(
        "lobby",
        Passphrase::from(passphrase),
        DisplayName::new(name).expect("valid name"),
    )
    .with_protocol(protocol);
    let seed = name.bytes().map(u64::from).sum();
    let session = ChatSession::new(SeededEnv::new(seed), &config).expect("session");

    let transport = bus.connect();
    let connector = async move { Ok::<_, TransportError>(transport) };
    Runtime::connect(session, connector, output).await.expect("connect")
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    let polled = async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    };
    tokio::time::timeout(WAIT, polled).await.expect("condition not reached in time");
}

fn senders(bus: &MemoryBus) -> Vec<String> {
    bus.published()
        .iter()
        .map(|p| Envelope::from_json(&p.body).expect("envelope").name)
        .collect()
}

#[tokio::test]
async fn shared_passphrase_reads_wrong_passphrase_cannot() {
    let bus = MemoryBus::new();
    let v1 = ProtocolVersion::V1;

    let bob = Participant::join(&bus, "bob", "secret", v1, ScriptedInput::idle()).await;
    let carol = Participant::join(&bus, "carol", "wrong", v1, ScriptedInput::idle()).await;
    wait_until(|| bus.published().len() == 2).await;

    let alice = Participant::join(&bus, "alice", "secret", v1, ScriptedInput::new(["hello"])).await;
    let alice_output = alice.output.clone();
    let (alice_runtime, result) = alice.done().await;
    result.expect("alice session");
    assert_eq!(alice_runtime.phase(), SessionPhase::Terminated);

    assert!(bob.output.wait_for("[alice] <joined>", WAIT).await);
    assert!(bob.output.wait_for("[alice] hello", WAIT).await);
    assert!(bob.output.wait_for("[alice] <left>", WAIT).await);
    assert!(carol.output.wait_for(&format!("[alice] {PLACEHOLDER}"), WAIT).await);
    assert!(!carol.output.lines().iter().any(|l| l.contains("hello")));

    // carol joined after bob, so bob saw her join notice and could not open it
    assert!(bob.output.lines().contains(&format!("[carol] {PLACEHOLDER}")));

    assert!(alice_output.lines().iter().all(|l| !l.starts_with("[alice]")));

    let (_, bob_result) = bob.finish().await;
    let (_, carol_result) = carol.finish().await;
    bob_result.expect("bob session");
    carol_result.expect("carol session");

    assert_eq!(senders(&bus), ["bob", "carol", "alice", "alice", "alice", "bob", "carol"]);
    assert_eq!(bus.flushes(), 3);
}

#[tokio::test]
async fn own_messages_never_rendered() {
    let bus = MemoryBus::new().with_duplicates();
    let input = ScriptedInput::new(["one", "two"]).then_wait();
    let alice = Participant::join(&bus, "alice", "secret", ProtocolVersion::V1, input).await;

    wait_until(|| bus.published().len() == 3).await;
    let output = alice.output.clone();
    let (_, result) = alice.finish().await;
    result.expect("alice session");

    assert!(output.lines().is_empty());
    assert!(output.prompts() >= 3);
}

#[tokio::test]
async fn blank_lines_publish_nothing() {
    let bus = MemoryBus::new();
    let input = ScriptedInput::new(["", "   ", "\t"]);
    let alice = Participant::join(&bus, "alice", "secret", ProtocolVersion::V1, input).await;
    let (_, result) = alice.done().await;
    result.expect("alice session");

    // join and departure only
    assert_eq!(bus.published().len(), 2);
}

#[tokio::test]
async fn duplicate_deliveries_rendered_each_time() {
    let bus = MemoryBus::new().with_duplicates();
    let bob = Participant::join(&bus, "bob", "secret", ProtocolVersion::V1, ScriptedInput::idle())
        .await;
    wait_until(|| bus.published().len() == 1).await;

    let alice = Participant::join(
        &bus,
        "alice",
        "secret",
        ProtocolVersion::V1,
        ScriptedInput::new(["hello"]),
    )
    .await;
    alice.done().await.1.expect("alice session");

    let output = bob.output.clone();
    wait_until(|| output.lines().iter().filter(|l| *l == "[alice] hello").count() == 2).await;
    bob.finish().await.1.expect("bob session");
}

#[tokio::test]
async fn protocol_versions_do_not_meet() {
    let bus = MemoryBus::new();
    let bob = Participant::join(&bus, "bob", "secret", ProtocolVersion::V1, ScriptedInput::idle())
        .await;
    wait_until(|| bus.published().len() == 1).await;

    let alice = Participant::join(
        &bus,
        "alice",
        "secret",
        ProtocolVersion::V2,
        ScriptedInput::new(["hello"]),
    )
    .await;
    alice.done().await.1.expect("alice session");

    assert_eq!(bus.published_on("snats.2.lobby").len(), 3);
    assert_eq!(bus.published_on("snats.1.lobby").len(), 1);

    let output = bob.output.clone();
    bob.finish().await.1.expect("bob session");
    assert!(output.lines().is_empty());
}

#[tokio::test]
async fn fresh_nonce_protocol_round_trips() {
    let bus = MemoryBus::new();
    let v2 = ProtocolVersion::V2;
    let bob = Participant::join(&bus, "bob", "secret", v2, ScriptedInput::idle()).await;
    wait_until(|| bus.published().len() == 1).await;

    let input = ScriptedInput::new(["hello", "hello"]);
    let alice = Participant::join(&bus, "alice", "secret", v2, input).await;
    alice.done().await.1.expect("alice session");

    let output = bob.output.clone();
    wait_until(|| output.lines().iter().filter(|l| *l == "[alice] hello").count() == 2).await;
    bob.finish().await.1.expect("bob session");

    let hellos: Vec<_> = bus
        .published_on("snats.2.lobby")
        .into_iter()
        .map(|p| Envelope::from_json(&p.body).expect("envelope"))
        .filter(|e| e.name == "alice")
        .collect();
    assert_eq!(hellos.len(), 4);
    assert_ne!(hellos[1].encrypted_msg, hellos[2].encrypted_msg);
}

#[tokio::test]
async fn interrupt_publishes_departure() {
    let bus = MemoryBus::new();
    let alice = Participant::join(&bus, "alice", "secret", ProtocolVersion::V1, ScriptedInput::idle())
        .await;
    wait_until(|| bus.published().len() == 1).await;

    let (runtime, result) = alice.finish().await;
    result.expect("alice session");
    assert_eq!(runtime.phase(), SessionPhase::Terminated);
    assert_eq!(bus.published().len(), 2);
    assert_eq!(bus.flushes(), 1);
}

#[tokio::test]
async fn rejected_publishes_do_not_end_session() {
    let bus = MemoryBus::new();
    bus.reject_publishes(true);
    let alice = Participant::join(
        &bus,
        "alice",
        "secret",
        ProtocolVersion::V1,
        ScriptedInput::new(["hello"]),
    )
    .await;

    let (runtime, result) = alice.done().await;
    result.expect("transient failures are swallowed");
    assert_eq!(runtime.phase(), SessionPhase::Terminated);
    assert!(bus.published().is_empty());
    assert_eq!(bus.flushes(), 1);
}

#[tokio::test]
async fn input_failure_still_departs() {
    let bus = MemoryBus::new();
    let input = ScriptedInput::new(["hello"]).then_fail();
    let alice = Participant::join(&bus, "alice", "secret", ProtocolVersion::V1, input).await;

    let (runtime, result) = alice.done().await;
    assert!(matches!(result, Err(SessionError::Input { .. })));
    assert_eq!(runtime.phase(), SessionPhase::Terminated);
    assert_eq!(bus.published().len(), 3);
}

#[tokio::test]
async fn closed_bus_terminates_before_announcing() {
    let bus = MemoryBus::new();
    bus.close();
    let alice = Participant::join(&bus, "alice", "secret", ProtocolVersion::V1, ScriptedInput::idle())
        .await;

    let (runtime, result) = alice.finish().await;
    let err = result.expect_err("subscribe must fail");
    assert!(err.is_fatal());
    assert_eq!(runtime.phase(), SessionPhase::Terminated);
    assert!(bus.published().is_empty());
}

#[tokio::test]
async fn unreachable_bus_is_fatal() {
    let config = SessionConfig::new(
        "lobby",
        Passphrase::from("secret"),
        DisplayName::new("alice").expect("valid name"),
    );
    let session = ChatSession::new(SeededEnv::new(1), &config).expect("session");

    let result: Result<ChatRuntime, _> = Runtime::connect(
        session,
        async { Err(TransportError::Connect { reason: "connection refused".into() }) },
        CapturedOutput::new(),
    )
    .await;

    let err = result.err().expect("connect must fail");
    assert!(matches!(err, SessionError::Transport(TransportError::Connect { .. })));
    assert!(err.is_fatal());
}

#[tokio::test]
async fn shutdown_before_active_ends_quietly() {
    let bus = MemoryBus::new();
    let output = CapturedOutput::new();
    let mut runtime = connect(&bus, "alice", "secret", ProtocolVersion::V1, output.clone()).await;
    assert_eq!(runtime.session().topic().as_str(), "snats.1.lobby");

    // the interrupt lands while the runtime is still connecting
    let (trigger, shutdown) = shutdown_channel();
    trigger.trigger();

    runtime.run(ScriptedInput::new(["hello"]), shutdown).await.expect("interrupted session");
    assert_eq!(runtime.phase(), SessionPhase::Terminated);
    assert!(bus.published().is_empty());
    assert_eq!(output.prompts(), 0);
}

#[tokio::test]
async fn deployed_peer_message_rendered() {
    let bus = MemoryBus::new();
    let bob = Participant::join(&bus, "bob", "secret", ProtocolVersion::V1, ScriptedInput::idle())
        .await;
    wait_until(|| bus.published().len() == 1).await;

    // sealed by an existing snats.1 client for alice/"secret" in lobby
    let body = br#"{"name":"alice","encrypted_msg":"g9HdK4PrSAKh9I/1AblELlTVVmFX6g=="}"#;
    let topic = Topic::new(ProtocolVersion::V1, "lobby").expect("topic");
    bus.connect().publish(&topic, Bytes::from_static(body)).await.expect("publish");

    assert!(bob.output.wait_for("[alice] hello", WAIT).await);
    bob.finish().await.1.expect("bob session");
}
