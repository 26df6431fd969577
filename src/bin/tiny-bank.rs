use anyhow::Result;
use rust_decimal::dec;

use tiny_bank::address::AddressDto;
use tiny_bank::bank::in_memory::InMemoryBank;
use tiny_bank::bank::{Bank, ClientDto, ReportKind, TransactionRequest};
use tiny_bank::render;

/// Small scripted walkthrough of the bank contract: register two clients,
/// move some money around, print the reports.
fn main() -> Result<()> {
    let mut bank = InMemoryBank::new("Banco Central do Demo");

    let ana = bank.register_client(ClientDto {
        name: "Ana Souza".into(),
        tax_id: "11122233344".into(),
        address: AddressDto {
            street: "Rua das Flores".into(),
            number: "123".into(),
            district: "Centro".into(),
            city: "Monte Carmelo".into(),
            state: "MG".into(),
            postal_code: "38500-000".into(),
            complement: Some("Apto 45".into()),
        },
    })?;
    let bruno = bank.register_client(ClientDto {
        name: "Bruno Lima".into(),
        tax_id: "55566677788".into(),
        address: AddressDto {
            street: "Avenida Brasil".into(),
            number: "500".into(),
            district: "Jardim".into(),
            city: "Uberaba".into(),
            state: "MG".into(),
            postal_code: "38000-000".into(),
            complement: None,
        },
    })?;

    let ana_checking = bank.open_account(&ana, "checking", dec!(100))?;
    let bruno_savings = bank.open_account(&bruno, "savings", dec!(0))?;

    let deposit = bank.execute_transaction(TransactionRequest::deposit(ana_checking, dec!(50)))?;
    println!("deposit confirmed: {deposit}");

    let withdrawal =
        bank.execute_transaction(TransactionRequest::withdrawal(ana_checking, dec!(40)))?;
    println!("withdrawal confirmed: {withdrawal}");

    let transfer = bank.execute_transaction(TransactionRequest::transfer(
        ana_checking,
        bruno_savings,
        dec!(25),
    ))?;
    println!("transfer confirmed: {transfer}");

    for kind in [ReportKind::Summary, ReportKind::Financial] {
        println!("\n--- {kind:?} ---");
        print!("{}", render::render_report(&bank.report(kind)?));
    }

    if let tiny_bank::bank::Report::Clients(records) = bank.report(ReportKind::Clients)? {
        println!("\n--- Clients ---");
        render::write_client_records(&mut std::io::stdout(), records)?;
    }

    Ok(())
}
