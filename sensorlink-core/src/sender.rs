//! Telemetry sender
//!
//! Builds one record per call, encodes it, and pushes it through the
//! framer. Every record kind owns a dedicated [`Packet`] that lives as long
//! as the sender and is overwritten on each send of that kind, so no two
//! kinds ever share a buffer.
//!
//! The sender is not re-entrant: calling the same kind's sender from an
//! interrupt while the main context is mid-send needs external locking.

use sensorlink_hal::{Clock, UartTx};
use sensorlink_protocol::{
    max_text_len, DataId, FrameError, Packet, TelemetryRecord, WireFormat, MAX_PAYLOAD_SIZE,
};

use crate::config::LinkConfig;

/// Why a record did not (completely) reach the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendError<E> {
    /// Input refused before anything was written
    Rejected(FrameError),
    /// The byte sink failed; the frame may be partially on the wire
    Transport(E),
}

impl<E> From<FrameError> for SendError<E> {
    fn from(e: FrameError) -> Self {
        SendError::Rejected(e)
    }
}

/// Pack `data` into `packet` and transmit it
///
/// Empty data is rejected, as is anything the framer refuses to pack. A
/// rejected call writes nothing and leaves `packet` as it was.
pub fn send_packet_data<T: UartTx, C: Clock>(
    packet: &mut Packet,
    wire: &WireFormat,
    clock: &C,
    tx: &mut T,
    data: &[u8],
) -> Result<(), SendError<T::Error>> {
    if data.is_empty() {
        return Err(SendError::Rejected(FrameError::EmptyPayload));
    }

    packet.pack(wire, clock, data)?;
    packet.send(tx).map_err(SendError::Transport)
}

/// Per-node telemetry context
///
/// Owns the byte sink, the clock, and the six per-kind packets.
pub struct TelemetrySender<T, C> {
    tx: T,
    clock: C,
    wire: WireFormat,
    packets: [Packet; DataId::COUNT],
}

impl<T: UartTx, C: Clock> TelemetrySender<T, C> {
    /// Create a sender using the canonical wire format
    pub fn new(tx: T, clock: C) -> Self {
        Self::with_wire_format(tx, clock, WireFormat::default())
    }

    /// Create a sender for a specific wire format
    pub fn with_wire_format(tx: T, clock: C, wire: WireFormat) -> Self {
        Self {
            tx,
            clock,
            wire,
            packets: core::array::from_fn(|_| Packet::new()),
        }
    }

    /// Create a sender from a stored link configuration
    ///
    /// Only `config.wire` is used; `config.uart` belongs to whoever set up
    /// the peripheral behind `tx`.
    pub fn from_config(tx: T, clock: C, config: &LinkConfig) -> Self {
        Self::with_wire_format(tx, clock, config.wire)
    }

    /// Active wire format
    pub fn wire_format(&self) -> &WireFormat {
        &self.wire
    }

    /// The persistent packet of one record kind, as last packed
    pub fn packet(&self, id: DataId) -> &Packet {
        &self.packets[id.index()]
    }

    /// Borrow the byte sink
    pub fn tx(&self) -> &T {
        &self.tx
    }

    /// Consume the sender and return the sink and clock
    pub fn into_parts(self) -> (T, C) {
        (self.tx, self.clock)
    }

    /// Encode a record and send it in its kind's packet
    ///
    /// Text longer than [`max_text_len`] is rejected here; use
    /// [`TelemetrySender::send_text_message`] to have it clamped instead.
    pub fn send_record(&mut self, record: &TelemetryRecord<'_>) -> Result<(), SendError<T::Error>> {
        let id = record.id();
        let len = record.encoded_len(&self.wire);
        if len > MAX_PAYLOAD_SIZE {
            return Err(SendError::Rejected(FrameError::PayloadTooLarge { len }));
        }

        let mut scratch = [0u8; MAX_PAYLOAD_SIZE];
        let len = record.encode(&self.wire, &mut scratch)?;

        let result = send_packet_data(
            &mut self.packets[id.index()],
            &self.wire,
            &self.clock,
            &mut self.tx,
            &scratch[..len],
        );

        #[cfg(feature = "defmt")]
        log_outcome(id, len, &result);

        result
    }

    /// Send a calendar date
    pub fn send_date(&mut self, day: u32, month: u32, year: u32) -> Result<(), SendError<T::Error>> {
        self.send_record(&TelemetryRecord::Date { day, month, year })
    }

    /// Send a time of day
    pub fn send_time(
        &mut self,
        hour: u8,
        minute: u16,
        second: u16,
    ) -> Result<(), SendError<T::Error>> {
        self.send_record(&TelemetryRecord::Time {
            hour,
            minute,
            second,
        })
    }

    /// Send one ADC sample
    pub fn send_adc_sample(
        &mut self,
        sample_count: u32,
        value: u16,
    ) -> Result<(), SendError<T::Error>> {
        self.send_record(&TelemetryRecord::AdcSample {
            sample_count,
            value,
        })
    }

    /// Send a text message
    ///
    /// Empty text is rejected without writing anything. Text that does
    /// not fit one payload is cut to [`max_text_len`] bytes; the remainder
    /// is dropped, never sent in a second frame.
    pub fn send_text_message(&mut self, text: &[u8]) -> Result<(), SendError<T::Error>> {
        if text.is_empty() {
            return Err(SendError::Rejected(FrameError::EmptyPayload));
        }

        let len = text.len().min(max_text_len(&self.wire));
        self.send_record(&TelemetryRecord::TextMessage { text: &text[..len] })
    }

    /// Send a button state change
    pub fn send_button_state(&mut self, button_id: u8, state: u16) -> Result<(), SendError<T::Error>> {
        self.send_record(&TelemetryRecord::ButtonState { button_id, state })
    }

    /// Send the MCU temperature in whole degrees Celsius
    pub fn send_mcu_temperature(&mut self, celsius: u16) -> Result<(), SendError<T::Error>> {
        self.send_record(&TelemetryRecord::McuTemperature { celsius })
    }
}

#[cfg(feature = "defmt")]
fn log_outcome<E>(id: DataId, len: usize, result: &Result<(), SendError<E>>) {
    match result {
        Ok(()) => defmt::trace!("{} frame sent ({} bytes)", id, len),
        Err(SendError::Rejected(e)) => defmt::debug!("{} frame rejected: {}", id, e),
        Err(SendError::Transport(_)) => defmt::warn!("{} frame transport failure", id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use proptest::prelude::*;
    use sensorlink_hal::UartConfig;
    use sensorlink_protocol::crc16;
    use sensorlink_protocol::testing::{FailingSink, RecordingSink};

    #[derive(Debug, Default)]
    struct ManualClock(Cell<u32>);

    impl Clock for ManualClock {
        fn now_ms(&self) -> u32 {
            self.0.get()
        }
    }

    fn sender() -> TelemetrySender<RecordingSink, ManualClock> {
        TelemetrySender::new(RecordingSink::default(), ManualClock::default())
    }

    fn sent_payload(sender: &TelemetrySender<RecordingSink, ManualClock>) -> &[u8] {
        let writes = &sender.tx().writes;
        assert_eq!(writes.len() % 3, 0);
        &writes[writes.len() - 2]
    }

    #[test]
    fn test_send_date() {
        let mut sender = sender();
        sender.send_date(15, 10, 2026).unwrap();

        let packet = sender.packet(DataId::Date);
        assert_eq!(packet.payload_size(), 13);
        assert_eq!(
            sent_payload(&sender),
            &[1, 15, 0, 0, 0, 10, 0, 0, 0, 0xEA, 0x07, 0, 0]
        );
    }

    #[test]
    fn test_send_time() {
        let mut sender = sender();
        sender.send_time(12, 34, 56).unwrap();
        assert_eq!(sent_payload(&sender), &[2, 12, 34, 0, 56, 0]);
    }

    #[test]
    fn test_send_adc_sample() {
        let mut sender = sender();
        sender.send_adc_sample(0x0102_0304, 4095).unwrap();
        assert_eq!(sent_payload(&sender), &[3, 0x04, 0x03, 0x02, 0x01, 0xFF, 0x0F]);
    }

    #[test]
    fn test_send_button_state() {
        let mut sender = sender();
        sender.send_button_state(2, 1).unwrap();
        assert_eq!(sent_payload(&sender), &[5, 2, 1, 0]);
    }

    #[test]
    fn test_send_mcu_temperature_frame() {
        let mut sender = sender();
        sender.clock.0.set(0x1234);
        sender.send_mcu_temperature(25).unwrap();

        let writes = &sender.tx().writes;
        assert_eq!(writes.len(), 3);
        assert_eq!(writes[0], vec![0xDE, 0xAB, 0x34, 0x12, 0x03, 0x00]);
        assert_eq!(writes[1], vec![0x06, 0x19, 0x00]);
        assert_eq!(writes[2], vec![0x49, 0xBE]);
    }

    #[test]
    fn test_send_short_text() {
        let mut sender = sender();
        sender.send_text_message(b"Hello").unwrap();

        assert_eq!(sender.packet(DataId::TextMessage).payload_size(), 8);
        assert_eq!(sent_payload(&sender), b"\x04\x05\x00Hello");
    }

    #[test]
    fn test_send_empty_text_rejected() {
        let mut sender = sender();
        let result = sender.send_text_message(&[]);

        assert_eq!(result, Err(SendError::Rejected(FrameError::EmptyPayload)));
        assert!(sender.tx().writes.is_empty());
        assert_eq!(sender.packet(DataId::TextMessage), &Packet::new());
    }

    #[test]
    fn test_long_text_is_clamped() {
        let text: Vec<u8> = (0..2000u32).map(|i| (i % 251) as u8).collect();
        let mut sender = sender();
        sender.send_text_message(&text).unwrap();

        let packet = sender.packet(DataId::TextMessage);
        assert_eq!(packet.payload_size() as usize, MAX_PAYLOAD_SIZE);

        let payload = sent_payload(&sender);
        assert_eq!(payload[0], 4);
        assert_eq!(u16::from_le_bytes([payload[1], payload[2]]), 1021);
        assert_eq!(&payload[3..], &text[..1021]);
    }

    #[test]
    fn test_oversized_text_record_rejected() {
        let text = [b'x'; MAX_PAYLOAD_SIZE];
        let mut sender = sender();
        let result = sender.send_record(&TelemetryRecord::TextMessage { text: &text });

        assert_eq!(
            result,
            Err(SendError::Rejected(FrameError::PayloadTooLarge {
                len: MAX_PAYLOAD_SIZE + 3
            }))
        );
        assert!(sender.tx().writes.is_empty());
    }

    #[test]
    fn test_send_packet_data_rejects_empty() {
        let mut packet = Packet::new();
        let mut sink = RecordingSink::default();
        let result = send_packet_data(
            &mut packet,
            &WireFormat::V2,
            &ManualClock::default(),
            &mut sink,
            &[],
        );

        assert_eq!(result, Err(SendError::Rejected(FrameError::EmptyPayload)));
        assert!(sink.writes.is_empty());
        assert_eq!(packet, Packet::new());
    }

    #[test]
    fn test_send_packet_data_rejects_oversized_without_resend() {
        let mut packet = Packet::new();
        let mut sink = RecordingSink::default();
        let clock = ManualClock::default();
        send_packet_data(&mut packet, &WireFormat::V2, &clock, &mut sink, &[1, 2, 3]).unwrap();
        let before = packet.clone();

        let big = [0u8; MAX_PAYLOAD_SIZE + 1];
        let result = send_packet_data(&mut packet, &WireFormat::V2, &clock, &mut sink, &big);

        assert!(matches!(
            result,
            Err(SendError::Rejected(FrameError::PayloadTooLarge { .. }))
        ));
        assert_eq!(sink.writes.len(), 3);
        assert_eq!(packet, before);
    }

    #[test]
    fn test_kinds_use_separate_packets() {
        let mut sender = sender();
        sender.send_adc_sample(1, 100).unwrap();
        let adc_before = sender.packet(DataId::AdcSample).clone();

        sender.send_button_state(1, 1).unwrap();
        sender.send_mcu_temperature(30).unwrap();

        assert_eq!(sender.packet(DataId::AdcSample), &adc_before);
        assert_eq!(sender.packet(DataId::Date), &Packet::new());
        assert_eq!(sender.packet(DataId::ButtonState).payload_size(), 4);
    }

    #[test]
    fn test_same_kind_packet_is_reused() {
        let mut sender = sender();
        sender.send_adc_sample(1, 100).unwrap();
        sender.clock.0.set(20);
        sender.send_adc_sample(2, 200).unwrap();

        let packet = sender.packet(DataId::AdcSample);
        assert_eq!(packet.timestamp(), 20);
        assert_eq!(packet.payload(), &[3, 2, 0, 0, 0, 200, 0]);
        assert_eq!(sender.tx().writes.len(), 6);
    }

    #[test]
    fn test_transport_failure_is_reported() {
        let broken = FailingSink {
            accepted: 0,
            limit: 0,
        };
        let mut sender = TelemetrySender::new(broken, ManualClock::default());
        assert_eq!(sender.send_time(1, 2, 3), Err(SendError::Transport(())));
        // Packing happened before the sink failed
        assert_eq!(sender.packet(DataId::Time).payload_size(), 6);
    }

    #[test]
    fn test_legacy_wire_format() {
        let mut sender = TelemetrySender::with_wire_format(
            RecordingSink::default(),
            ManualClock::default(),
            WireFormat::V1,
        );
        sender.send_mcu_temperature(25).unwrap();

        let writes = &sender.tx().writes;
        assert_eq!(&writes[0][..2], &[0xDE, 0x00]);
        assert_eq!(writes[1], vec![6, 0, 0, 0, 25, 0]);
    }

    #[test]
    fn test_from_config() {
        let config = LinkConfig {
            wire: WireFormat::V1,
            ..LinkConfig::default()
        };
        let sender = TelemetrySender::from_config(RecordingSink::default(), ManualClock::default(), &config);
        assert_eq!(sender.wire_format(), &WireFormat::V1);

        let (sink, _clock) = sender.into_parts();
        assert!(sink.writes.is_empty());
    }

    #[test]
    fn test_from_config_frames_ignore_uart_settings() {
        let slow = LinkConfig {
            uart: UartConfig {
                baudrate: 9600,
                ..UartConfig::default()
            },
            ..LinkConfig::default()
        };
        let fast = LinkConfig {
            uart: UartConfig {
                baudrate: 921_600,
                ..UartConfig::default()
            },
            ..LinkConfig::default()
        };

        let mut a = TelemetrySender::from_config(RecordingSink::default(), ManualClock::default(), &slow);
        let mut b = TelemetrySender::from_config(RecordingSink::default(), ManualClock::default(), &fast);
        a.send_button_state(1, 1).unwrap();
        b.send_button_state(1, 1).unwrap();

        assert_eq!(a.tx().bytes(), b.tx().bytes());
    }

    proptest! {
        #[test]
        fn prop_frames_match_wire_image(
            sample_count in any::<u32>(),
            value in any::<u16>(),
            now_ms in any::<u32>(),
        ) {
            let mut sender = sender();
            sender.clock.0.set(now_ms);
            sender.send_adc_sample(sample_count, value).unwrap();

            let packet = sender.packet(DataId::AdcSample);
            let writes = &sender.tx().writes;
            let bytes = writes.concat();
            let frame = packet.to_vec().unwrap();
            let stamp = (now_ms as u16).to_le_bytes();

            prop_assert_eq!(writes.len(), 3);
            prop_assert_eq!(&bytes[..], &frame[..]);
            prop_assert_eq!(&bytes[2..4], &stamp[..]);
            prop_assert_eq!(
                u16::from_le_bytes([bytes[13], bytes[14]]),
                crc16(&bytes[..13])
            );
        }

        #[test]
        fn prop_text_never_exceeds_payload(len in 1usize..3000) {
            let text = vec![b'a'; len];
            let mut sender = sender();
            sender.send_text_message(&text).unwrap();

            let size = sender.packet(DataId::TextMessage).payload_size() as usize;
            prop_assert!(size <= MAX_PAYLOAD_SIZE);
            prop_assert_eq!(size, 3 + len.min(1021));
        }
    }
}
