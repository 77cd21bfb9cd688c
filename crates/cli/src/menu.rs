//! Interactive menus: main menu and in-session menu

use crate::console::Console;
use rust_decimal::Decimal;
use safebank_core::{
    is_strong_password, is_valid_pin, AccountApplication, AccountRegistry, AccountType,
    IdDocument, IdType, Session,
};
use std::io::{self, BufRead, Write};

const MAIN_MENU: &str = "\n1.Create Account\n2.Login\n3.Forgot Password\n4.Exit";
const SESSION_MENU: &str =
    "\n1.Balance 2.Deposit 3.Withdraw 4.History 5.Interest 6.Change Pass 7.Logout";

/// Run the main menu until Exit or end of input
pub fn run<R: BufRead, W: Write>(
    registry: &mut AccountRegistry,
    console: &mut Console<R, W>,
) -> io::Result<()> {
    match main_loop(registry, console) {
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            tracing::debug!("Input closed, exiting");
            Ok(())
        }
        other => other,
    }
}

fn main_loop<R: BufRead, W: Write>(
    registry: &mut AccountRegistry,
    console: &mut Console<R, W>,
) -> io::Result<()> {
    loop {
        console.say(MAIN_MENU)?;
        let choice: u32 = console.read_parsed("Choice: ")?;
        match choice {
            1 => create_account(registry, console)?,
            2 => login(registry, console)?,
            3 => forgot_password(registry, console)?,
            4 => return Ok(()),
            _ => console.say("Invalid choice!")?,
        }
    }
}

fn create_account<R: BufRead, W: Write>(
    registry: &mut AccountRegistry,
    console: &mut Console<R, W>,
) -> io::Result<()> {
    let number: u64 = console.read_parsed("\nEnter Account Number: ")?;
    if registry.contains(number) {
        return console.say("Account number already exists!");
    }

    let verifier = registry.verifier();
    let name = console.read_until("Enter Name: ", "Invalid name! Enter again: ", |s| {
        verifier.verify_name(s).then(|| s.to_string())
    })?;

    let account_type = console.read_until(
        "Account Type (1-Savings, 2-Current): ",
        "Invalid type! Re-enter: ",
        |s| match s {
            "1" => Some(AccountType::Savings),
            "2" => Some(AccountType::Current),
            _ => None,
        },
    )?;

    let password = console.read_until("Set Password: ", "Weak password! Re-enter: ", |s| {
        is_strong_password(s).then(|| s.to_string())
    })?;

    let pin = console.read_until("Set 4-digit PIN: ", "Invalid PIN! Re-enter: ", |s| {
        s.parse::<u32>().ok().filter(|p| is_valid_pin(*p))
    })?;

    console.say("\nSelect ID Proof:\n1.Aadhaar\n2.PAN\n3.Passport\n4.Voter ID\n5.Driving License")?;
    let id_type = console.read_until("Choice: ", "Invalid choice! Re-enter: ", |s| {
        let index: usize = s.parse().ok()?;
        IdType::all_types().get(index.checked_sub(1)?).copied()
    })?;
    let id_document = console.read_until("Enter ID Number: ", "Invalid ID! Re-enter: ", |s| {
        let document = IdDocument::new(id_type, s);
        verifier.verify_document(&document).then_some(document)
    })?;

    let security_answer = console.read_line("Security Question (favorite color): ")?;
    let initial_deposit: Decimal = console.read_parsed("Initial Deposit: ")?;

    let application = AccountApplication {
        number,
        name,
        account_type,
        password,
        pin,
        id_document,
        security_answer,
        initial_deposit,
    };

    match registry.open_account(application, console) {
        Ok(_) => console.say("Account created successfully!"),
        Err(e) => console.say(format!("Account not created: {}", e)),
    }
}

fn login<R: BufRead, W: Write>(
    registry: &mut AccountRegistry,
    console: &mut Console<R, W>,
) -> io::Result<()> {
    let number: u64 = console.read_parsed("Enter Account Number: ")?;
    let password = console.read_line("Enter Password: ")?;

    match registry.login(number, &password, console) {
        Ok(session) => {
            console.say("Login successful!")?;
            session_loop(session, console)
        }
        Err(e) => console.say(e),
    }
}

fn forgot_password<R: BufRead, W: Write>(
    registry: &mut AccountRegistry,
    console: &mut Console<R, W>,
) -> io::Result<()> {
    let number: u64 = console.read_parsed("Enter Account Number: ")?;
    if !registry.contains(number) {
        return console.say("Account not found!");
    }

    let answer = console.read_line("Security Answer: ")?;
    let mut reset = match registry.begin_password_reset(number, &answer, console) {
        Ok(reset) => reset,
        Err(e) => return console.say(e),
    };

    // New password is only asked for once the OTP has passed
    let new_password = console.read_until("Enter new password: ", "Weak password! Re-enter: ", |s| {
        is_strong_password(s).then(|| s.to_string())
    })?;

    match reset.complete(&new_password) {
        Ok(()) => console.say("Password reset successful. Login again."),
        Err(e) => console.say(e),
    }
}

fn session_loop<R: BufRead, W: Write>(
    mut session: Session<'_>,
    console: &mut Console<R, W>,
) -> io::Result<()> {
    loop {
        console.say(SESSION_MENU)?;
        let option: u32 = console.read_parsed("Choice: ")?;
        match option {
            1 => {
                let pin: u32 = console.read_parsed("Enter PIN: ")?;
                match session.check_balance(pin) {
                    Ok(balance) => console.say(format!("Balance: {}", balance))?,
                    Err(e) => console.say(e)?,
                }
            }
            2 => {
                let amount = read_amount(console)?;
                match session.deposit(amount) {
                    Ok(()) => console.say(format!("Deposited: {}", amount))?,
                    Err(e) => console.say(e)?,
                }
            }
            3 => {
                let pin: u32 = console.read_parsed("Enter PIN: ")?;
                let amount = read_amount(console)?;
                match session.withdraw(pin, amount) {
                    Ok(()) => console.say(format!("Withdrawn: {}", amount))?,
                    Err(e) => console.say(e)?,
                }
            }
            4 => {
                if session.transactions().len() == 0 {
                    console.say("No transactions yet.")?;
                }
                for entry in session.transactions() {
                    console.say(entry)?;
                }
            }
            5 => match session.interest() {
                Ok(interest) => console.say(format!("Annual Interest: {}", interest))?,
                Err(e) => console.say(e)?,
            },
            6 => {
                let old = console.read_line("Enter current password: ")?;
                let new = console.read_line("Enter new password: ")?;
                match session.change_password(&old, &new) {
                    Ok(()) => console.say("Password changed successfully!")?,
                    Err(e) => console.say(e)?,
                }
            }
            7 => {
                session.logout();
                return Ok(());
            }
            _ => console.say("Invalid choice!")?,
        }
    }
}

/// Amounts are validated here, the core accepts any value
fn read_amount<R: BufRead, W: Write>(console: &mut Console<R, W>) -> io::Result<Decimal> {
    console.read_until("Enter amount: ", "Amount must be a positive number! Re-enter: ", |s| {
        s.parse::<Decimal>().ok().filter(|a| *a > Decimal::ZERO)
    })
}
