mod common;

#[cfg(test)]
mod ledger_tests {
    use std::sync::Arc;

    use super::common::{sample_request, ClientSheetFailingStore, FailingStore};
    use advance_request_server::ledger::clients::CLIENTS_SHEET;
    use advance_request_server::ledger::writer::{LEDGER_HEADER, LEDGER_SHEET};
    use advance_request_server::ledger::{
        CellValue, ClientDirectory, LedgerError, LedgerWriter, MemoryStore, TabularStore,
    };
    use advance_request_server::request::GrandTotal;
    use chrono::TimeZone;
    use chrono_tz::America::Bogota;

    fn writer(store: Arc<MemoryStore>) -> (LedgerWriter, Arc<ClientDirectory>) {
        let clients = Arc::new(ClientDirectory::new(store.clone()));
        (LedgerWriter::new(store, clients.clone()), clients)
    }

    #[tokio::test]
    async fn test_first_append_creates_sheet_with_header() {
        let store = Arc::new(MemoryStore::new());
        let (writer, _) = writer(store.clone());
        let mut request = sample_request();
        request.formatted_total = GrandTotal::for_request(&request).formatted();
        let timestamp = Bogota.with_ymd_and_hms(2024, 5, 2, 9, 30, 0).unwrap();

        let row = writer.append(&request, &timestamp).await.unwrap();

        let rows = store.rows(LEDGER_SHEET).await.unwrap();
        assert_eq!(rows.len(), 2);
        let header: Vec<CellValue> = LEDGER_HEADER.iter().map(|h| CellValue::from(*h)).collect();
        assert_eq!(rows[0], header);
        assert_eq!(rows[1], row.cells);

        assert_eq!(row.subtotals.usd, 12.5);
        assert_eq!(row.subtotals.cop, 5000.0);
        assert_eq!(row.get("Commercial"), Some(&CellValue::from("Johnny Farah")));
        assert_eq!(row.get("TRM"), Some(&CellValue::from(4000.0)));
        assert_eq!(
            row.get("Total en COP TRM"),
            Some(&CellValue::from("$55.000,00 COP"))
        );
    }

    #[tokio::test]
    async fn test_client_list_failure_after_row_is_written() {
        let store = Arc::new(ClientSheetFailingStore::new());
        let clients = Arc::new(ClientDirectory::new(store.clone()));
        let writer = LedgerWriter::new(store.clone(), clients);
        let timestamp = Bogota.with_ymd_and_hms(2024, 5, 2, 9, 30, 0).unwrap();

        let result = writer.append(&sample_request(), &timestamp).await;
        match result {
            Err(LedgerError::ClientListUpdate(inner)) => {
                assert!(matches!(*inner, LedgerError::Api { status: 503, .. }))
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
        assert_eq!(store.inner.rows(LEDGER_SHEET).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_second_append_keeps_single_header() {
        let store = Arc::new(MemoryStore::new());
        let (writer, _) = writer(store.clone());
        let timestamp = Bogota.with_ymd_and_hms(2024, 5, 2, 9, 30, 0).unwrap();

        writer.append(&sample_request(), &timestamp).await.unwrap();
        writer.append(&sample_request(), &timestamp).await.unwrap();

        let rows = store.rows(LEDGER_SHEET).await.unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[tokio::test]
    async fn test_new_client_is_registered_once() {
        let store = Arc::new(MemoryStore::new());
        let (writer, clients) = writer(store.clone());
        let timestamp = Bogota.with_ymd_and_hms(2024, 5, 2, 9, 30, 0).unwrap();

        writer.append(&sample_request(), &timestamp).await.unwrap();
        let mut again = sample_request();
        again.client = "  ACME LOGISTICS ".to_string();
        writer.append(&again, &timestamp).await.unwrap();

        assert_eq!(clients.list().await.unwrap(), vec!["Acme Logistics".to_string()]);
        let rows = store.rows(CLIENTS_SHEET).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec![CellValue::from("Cliente")]);
    }

    #[tokio::test]
    async fn test_client_list_without_sheet_is_empty() {
        let store = Arc::new(MemoryStore::new());
        let clients = ClientDirectory::new(store);
        assert!(clients.list().await.unwrap().is_empty());
        assert!(!clients.contains("Acme").await.unwrap());
    }

    #[tokio::test]
    async fn test_client_list_skips_header_and_blanks() {
        let store = Arc::new(MemoryStore::new());
        store.add_sheet(CLIENTS_SHEET).await.unwrap();
        for name in ["Cliente", "Acme", "", "Globex"] {
            store
                .append_row(CLIENTS_SHEET, &[CellValue::from(name)])
                .await
                .unwrap();
        }

        let clients = ClientDirectory::new(store);
        assert_eq!(
            clients.list().await.unwrap(),
            vec!["Acme".to_string(), "Globex".to_string()]
        );
        assert!(clients.contains(" globex ").await.unwrap());
    }

    #[tokio::test]
    async fn test_register_refreshes_cached_list() {
        let store = Arc::new(MemoryStore::new());
        let clients = ClientDirectory::new(store);
        assert!(clients.list().await.unwrap().is_empty());

        assert!(clients.register("Initech").await.unwrap());
        assert!(!clients.register("initech").await.unwrap());
        assert_eq!(clients.list().await.unwrap(), vec!["Initech".to_string()]);
    }

    #[tokio::test]
    async fn test_store_failure_is_surfaced() {
        let store: Arc<dyn TabularStore> = Arc::new(FailingStore);
        let clients = Arc::new(ClientDirectory::new(store.clone()));
        let writer = LedgerWriter::new(store, clients);
        let timestamp = Bogota.with_ymd_and_hms(2024, 5, 2, 9, 30, 0).unwrap();

        let result = writer.append(&sample_request(), &timestamp).await;
        assert!(matches!(result, Err(LedgerError::Api { status: 503, .. })));
    }
}
