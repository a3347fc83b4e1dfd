//! Test utilities for analyzer unit tests.
//!
//! Provides canned workflow documents and a [`ProjectFixture`] builder that
//! writes a complete project folder (manifest plus `.xaml` files) to disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use analyzer::test_support::{ProjectFixture, MAIN_XAML};
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! let dir = ProjectFixture::process("Demo")
//!     .with_workflow("Main.xaml", MAIN_XAML)
//!     .write_to(tmp.path())
//!     .unwrap();
//! ```

pub mod fixtures;

pub use fixtures::*;

/// A REFramework-style entry point.
///
/// Root activity `StateMachine` named "General Business Process", two
/// arguments (one `In` with a default value), variables in two scopes, three
/// invocations (one duplicated) and two selectors, one behind a `Target`.
pub const MAIN_XAML: &str = r#"<Activity mc:Ignorable="sap sap2010" x:Class="Main" this:Main.in_OrchestratorQueueName="ProcessQueue"
  xmlns="http://schemas.microsoft.com/netfx/2009/xaml/activities"
  xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006"
  xmlns:sap="http://schemas.microsoft.com/netfx/2009/xaml/activities/presentation"
  xmlns:sap2010="http://schemas.microsoft.com/netfx/2010/xaml/activities/presentation"
  xmlns:scg="clr-namespace:System.Collections.Generic;assembly=mscorlib"
  xmlns:s="clr-namespace:System;assembly=mscorlib"
  xmlns:this="clr-namespace:"
  xmlns:ui="http://schemas.uipath.com/workflow/activities"
  xmlns:x="http://schemas.microsoft.com/winfx/2006/xaml">
  <x:Members>
    <x:Property sap2010:Annotation.AnnotationText="Queue to work on" Name="in_OrchestratorQueueName" Type="InArgument(x:String)" />
    <x:Property Name="out_TransactionCount" Type="OutArgument(x:Int32)" />
  </x:Members>
  <sap2010:WorkflowViewState.IdRef>Main_1</sap2010:WorkflowViewState.IdRef>
  <TextExpression.NamespacesForImplementation>
    <scg:List x:TypeArguments="x:String" Capacity="4">
      <x:String>System</x:String>
    </scg:List>
  </TextExpression.NamespacesForImplementation>
  <StateMachine DisplayName="General Business Process" sap2010:Annotation.AnnotationText="Entry point of the robotic enterprise framework.">
    <StateMachine.Variables>
      <Variable x:TypeArguments="scg:Dictionary(x:String, x:Object)" Name="Config" />
      <Variable x:TypeArguments="s:Exception" Name="SystemException" />
    </StateMachine.Variables>
    <State DisplayName="Initialization">
      <State.Entry>
        <Sequence DisplayName="Initialization Procedures">
          <ui:InvokeWorkflowFile DisplayName="Invoke InitAllSettings" WorkflowFileName="Framework\InitAllSettings.xaml" />
          <ui:Click DisplayName="Click 'Submit'">
            <ui:Click.Target>
              <ui:Target Selector="&lt;webctrl tag='BUTTON' /&gt;" />
            </ui:Click.Target>
          </ui:Click>
          <ui:ElementExists DisplayName="Check App" Selector="&lt;wnd app='notepad.exe' /&gt;" />
        </Sequence>
      </State.Entry>
    </State>
    <State DisplayName="Process Transaction">
      <State.Entry>
        <Sequence DisplayName="Process">
          <ui:InvokeWorkflowFile DisplayName="Invoke Process" WorkflowFileName="Framework\Process.xaml" />
          <ui:InvokeWorkflowFile DisplayName="Invoke Process again" WorkflowFileName="Framework/Process.xaml" />
        </Sequence>
      </State.Entry>
    </State>
  </StateMachine>
</Activity>
"#;

/// A file without a single element, which no amount of recovery can read.
pub const BROKEN_XAML: &str = "not a workflow";

/// Build a minimal workflow with a `Sequence` root activity.
///
/// The annotation attribute is only written when `annotation` is not empty;
/// `body` is inserted inside the sequence.
pub fn workflow_xaml(display_name: &str, annotation: &str, body: &str) -> String {
    let annotation_attr = if annotation.is_empty() {
        String::new()
    } else {
        format!(" sap2010:Annotation.AnnotationText=\"{}\"", annotation)
    };

    format!(
        r#"<Activity x:Class="Workflow"
  xmlns="http://schemas.microsoft.com/netfx/2009/xaml/activities"
  xmlns:sap2010="http://schemas.microsoft.com/netfx/2010/xaml/activities/presentation"
  xmlns:ui="http://schemas.uipath.com/workflow/activities"
  xmlns:x="http://schemas.microsoft.com/winfx/2006/xaml">
  <x:Members>
    <x:Property Name="in_Value" Type="InArgument(x:String)" />
  </x:Members>
  <Sequence DisplayName="{}"{}>
    {}
  </Sequence>
</Activity>
"#,
        display_name, annotation_attr, body
    )
}
