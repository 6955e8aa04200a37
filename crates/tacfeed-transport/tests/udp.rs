//! Integration tests for the UDP source.
//!
//! These bind real sockets on the loopback interface and push datagrams
//! through them, so they exercise the OS network stack end to end.

#[cfg(feature = "udp")]
mod udp {
    use std::time::Duration;

    use tacfeed_transport::{DatagramSource, TransportError, UdpSource};
    use tokio::net::UdpSocket;

    #[tokio::test]
    async fn test_udp_source_receives_datagrams_in_order() {
        let mut source = UdpSource::bind("127.0.0.1:0").await.expect("should bind");
        let target = source.local_addr();

        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        sender.send_to(&[0, 101, 2, 3], target).await.unwrap();
        sender.send_to(&[0, 106], target).await.unwrap();

        let first = tokio::time::timeout(Duration::from_secs(2), source.recv())
            .await
            .expect("datagram should arrive")
            .unwrap();
        assert_eq!(first, Some(vec![0, 101, 2, 3]));

        let second = tokio::time::timeout(Duration::from_secs(2), source.recv())
            .await
            .expect("datagram should arrive")
            .unwrap();
        assert_eq!(second, Some(vec![0, 106]));
    }

    #[tokio::test]
    async fn test_udp_source_preserves_large_datagram() {
        let mut source = UdpSource::bind("127.0.0.1:0").await.unwrap();
        let payload: Vec<u8> = (0..4000).map(|i| (i % 251) as u8).collect();

        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        sender.send_to(&payload, source.local_addr()).await.unwrap();

        let got = tokio::time::timeout(Duration::from_secs(2), source.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(got, Some(payload));
    }

    #[tokio::test]
    async fn test_udp_source_bind_invalid_address_fails() {
        let result = UdpSource::bind("not-an-address").await;
        assert!(matches!(result, Err(TransportError::BindFailed { .. })));
    }

    #[tokio::test]
    async fn test_udp_source_bind_port_in_use_fails() {
        let first = UdpSource::bind("127.0.0.1:0").await.unwrap();
        let addr = first.local_addr().to_string();
        let second = UdpSource::bind(&addr).await;
        assert!(matches!(second, Err(TransportError::BindFailed { .. })));
    }
}
